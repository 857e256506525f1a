// Domain layer: request models and ports. Transport lives under adapters.

pub mod model;
pub mod ports;
