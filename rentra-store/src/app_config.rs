use rentra_catalog::QuoteConfig;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub redis: RedisConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
    /// The mirror cache is optional; with it disabled the API serves live
    /// reads only.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    pub insurance_cents_per_day: i64,
    pub tax_rate: f64,
}

impl BusinessRules {
    pub fn quote_config(&self) -> QuoteConfig {
        QuoteConfig {
            insurance_cents_per_day: self.insurance_cents_per_day,
            tax_rate: self.tax_rate,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file that shouldn't be checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of RENTRA)
            // Eg.. `RENTRA__SERVER__PORT=9000` would set the server port
            .add_source(config::Environment::with_prefix("RENTRA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
