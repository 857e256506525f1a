use crate::domain::ports::ConnectionSettings;
use crate::utils::error::{EconomicError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub economic: EconomicConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct EconomicConfig {
    pub agreement_number: u64,
    pub user_name: String,
    pub password: String,
    pub wsdl_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub verbose: bool,
}

impl TransportConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Compact,
            verbose: false,
        }
    }
}

// 密碼不可出現在日誌中
impl fmt::Debug for EconomicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EconomicConfig")
            .field("agreement_number", &self.agreement_number)
            .field("user_name", &self.user_name)
            .field("password", &"***")
            .field("wsdl_url", &self.wsdl_url)
            .finish()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("economic", &self.economic)
            .field("transport", &self.transport)
            .field("logging", &self.logging)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        agreement_number: u64,
        user_name: impl Into<String>,
        password: impl Into<String>,
        wsdl_url: impl Into<String>,
    ) -> Self {
        Self {
            economic: EconomicConfig {
                agreement_number,
                user_name: user_name.into(),
                password: password.into(),
                wsdl_url: wsdl_url.into(),
            },
            transport: TransportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_vars(content, |name| std::env::var(name).ok())?;

        toml::from_str(&processed_content).map_err(|e| EconomicError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ECONOMIC_PASSWORD})；查無的變數保留原樣
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EconomicError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.transport.request_timeout()
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number(
            "economic.agreement_number",
            self.economic.agreement_number,
            1,
        )?;
        validation::validate_non_empty("economic.user_name", &self.economic.user_name)?;
        validation::validate_locator("economic.wsdl_url", &self.economic.wsdl_url)?;

        if let Some(timeout) = self.transport.timeout_seconds {
            validation::validate_positive_number("transport.timeout_seconds", timeout, 1)?;
        }

        validation::validate_one_of(
            "logging.level",
            &self.logging.level,
            &["trace", "debug", "info", "warn", "error"],
        )?;

        Ok(())
    }
}

impl ConnectionSettings for ClientConfig {
    fn agreement_number(&self) -> u64 {
        self.economic.agreement_number
    }

    fn user_name(&self) -> &str {
        &self.economic.user_name
    }

    fn password(&self) -> &str {
        &self.economic.password
    }

    fn wsdl_url(&self) -> &str {
        &self.economic.wsdl_url
    }
}
