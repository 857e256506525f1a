pub mod toml_config;

pub use toml_config::{ClientConfig, EconomicConfig, LogFormat, LoggingConfig, TransportConfig};
