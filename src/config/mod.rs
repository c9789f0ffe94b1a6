pub mod toml_config;

pub use toml_config::{AppConfig, LedgerConfig, PricingConfig, SignerConfig, StayConfig};
