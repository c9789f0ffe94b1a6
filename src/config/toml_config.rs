use crate::core::pricing::PriceCalculator;
use crate::core::ConfigProvider;
use crate::domain::model::StayConstraint;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{validate_address, validate_positive_number, validate_url, Validate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_SIGNER_TIMEOUT_SECONDS: u64 = 300;
const DEFAULT_CONFIRMATION_TIMEOUT_SECONDS: u64 = 120;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
    pub signer: Option<SignerConfig>,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub stay: StayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub rpc_url: String,
    pub contract_address: String,
    pub chain_id: u64,
    pub request_timeout_seconds: Option<u64>,
    pub confirmation_timeout_seconds: Option<u64>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerConfig {
    pub endpoint: String,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_day: Decimal,
    pub currency_symbol: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_day: PriceCalculator::DEFAULT_PRICE_PER_DAY,
            currency_symbol: "XFI".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StayConfig {
    pub default_max_stay: u32,
}

impl Default for StayConfig {
    fn default() -> Self {
        Self {
            default_max_stay: StayConstraint::DEFAULT_MAX_STAY,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BookingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BookingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOTEL_CONTRACT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn override_rpc_url(&mut self, rpc_url: String) {
        tracing::info!("🔧 RPC URL overridden to: {}", rpc_url);
        self.ledger.rpc_url = rpc_url;
    }

    pub fn override_signer_endpoint(&mut self, endpoint: String) {
        tracing::info!("🔧 Signing agent endpoint overridden to: {}", endpoint);
        let request_timeout_seconds = self.signer.as_ref().and_then(|s| s.request_timeout_seconds);
        self.signer = Some(SignerConfig {
            endpoint,
            request_timeout_seconds,
        });
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("ledger.rpc_url", &self.ledger.rpc_url)?;
        validate_address("ledger.contract_address", &self.ledger.contract_address)?;
        validate_positive_number("ledger.chain_id", self.ledger.chain_id, 1)?;

        for (field, value) in [
            ("ledger.request_timeout_seconds", self.ledger.request_timeout_seconds),
            ("ledger.confirmation_timeout_seconds", self.ledger.confirmation_timeout_seconds),
            ("ledger.poll_interval_ms", self.ledger.poll_interval_ms),
        ] {
            if let Some(value) = value {
                validate_positive_number(field, value, 1)?;
            }
        }

        if let Some(signer) = &self.signer {
            validate_url("signer.endpoint", &signer.endpoint)?;
            if let Some(timeout) = signer.request_timeout_seconds {
                validate_positive_number("signer.request_timeout_seconds", timeout, 1)?;
            }
        }

        if self.pricing.price_per_day <= Decimal::ZERO {
            return Err(BookingError::InvalidConfigValueError {
                field: "pricing.price_per_day".to_string(),
                value: self.pricing.price_per_day.to_string(),
                reason: "Price per day must be greater than zero".to_string(),
            });
        }

        validate_positive_number("stay.default_max_stay", u64::from(self.stay.default_max_stay), 1)?;

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn rpc_url(&self) -> &str {
        &self.ledger.rpc_url
    }

    fn contract_address(&self) -> &str {
        &self.ledger.contract_address
    }

    fn chain_id(&self) -> u64 {
        self.ledger.chain_id
    }

    fn signer_endpoint(&self) -> Option<&str> {
        self.signer.as_ref().map(|s| s.endpoint.as_str())
    }

    fn price_per_day(&self) -> Decimal {
        self.pricing.price_per_day
    }

    fn currency_symbol(&self) -> &str {
        &self.pricing.currency_symbol
    }

    fn default_max_stay(&self) -> u32 {
        self.stay.default_max_stay
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.ledger
                .request_timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        )
    }

    fn signer_timeout(&self) -> Duration {
        Duration::from_secs(
            self.signer
                .as_ref()
                .and_then(|s| s.request_timeout_seconds)
                .unwrap_or(DEFAULT_SIGNER_TIMEOUT_SECONDS),
        )
    }

    fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(
            self.ledger
                .confirmation_timeout_seconds
                .unwrap_or(DEFAULT_CONFIRMATION_TIMEOUT_SECONDS),
        )
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.ledger.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
