use clap::Parser;
use dino_relay::utils::{logger, validation::Validate};
use dino_relay::{AppState, CliConfig, DeployClient, DinosaurIndex, RelayError, TomlConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // The config file may switch logging on, so it is merged first.
    if let Some(path) = config.config.clone() {
        if let Err(e) = TomlConfig::from_file(&path).and_then(|file| config.merge_file(&file)) {
            exit_with(&e);
        }
    }

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting dino-relay");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let dinosaurs = match &config.dataset_path {
        Some(path) => DinosaurIndex::from_file(path),
        None => DinosaurIndex::embedded(),
    };
    let dinosaurs = match dinosaurs {
        Ok(index) => index,
        Err(e) => {
            tracing::error!("❌ Failed to load dinosaur dataset: {}", e);
            exit_with(&e);
        }
    };
    tracing::info!(records = dinosaurs.len(), "Dinosaur dataset loaded");

    let bind_address = config.socket_addr()?;
    let max_upload_bytes = config.max_upload_bytes;

    let client = DeployClient::new(config)?;
    tracing::info!(
        endpoint = %client.config().api_endpoint,
        organization_id = %client.config().organization_id,
        "Upstream client ready"
    );

    let state = Arc::new(AppState::new(Arc::new(client), Arc::new(dinosaurs)));

    if let Err(e) = dino_relay::serve(state, bind_address, max_upload_bytes).await {
        tracing::error!("❌ Relay stopped: {}", e);
        exit_with(&e);
    }

    Ok(())
}

fn exit_with(e: &RelayError) -> ! {
    eprintln!("❌ {}", e);
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(1);
}
