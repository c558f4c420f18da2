// Domain layer: models and ports. Concrete upstream and config adapters live elsewhere.

pub mod model;
pub mod ports;
