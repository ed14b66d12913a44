use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3050;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_DEV_ORIGIN: &str = "http://localhost:5174"; // Vite dev server
pub const BROADCAST_CAPACITY: usize = 256; // per-subscriber fan-out queue depth

/// Top-level config (paywatch.toml + PAYWATCH_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaywatchConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

impl Default for PaywatchConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            frontend: FrontendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Externally reachable base URL, advertised to the payment provider
    /// (the webhook ingress lives at `{public_url}/webhook`).
    pub public_url: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            public_url: None,
        }
    }
}

/// Dashboard origin policy.
///
/// Both configured origins are always allowed to connect; the `production`
/// flag only selects which one is reported as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    #[serde(default = "default_dev_origin")]
    pub dev_origin: String,
    pub prod_origin: Option<String>,
    #[serde(default)]
    pub production: bool,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dev_origin: default_dev_origin(),
            prod_origin: None,
            production: false,
        }
    }
}

impl FrontendConfig {
    /// Every origin allowed to reach the HTTP surface and the push channel.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.dev_origin.clone()];
        if let Some(ref prod) = self.prod_origin {
            if prod != &self.dev_origin {
                origins.push(prod.clone());
            }
        }
        origins
    }

    /// The origin the current deployment mode treats as primary.
    pub fn authoritative_origin(&self) -> &str {
        match (&self.prod_origin, self.production) {
            (Some(prod), true) => prod,
            _ => &self.dev_origin,
        }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins().iter().any(|o| o == origin)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_dev_origin() -> String {
    DEFAULT_DEV_ORIGIN.to_string()
}

impl PaywatchConfig {
    /// Load config from a TOML file with PAYWATCH_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ./paywatch.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path.unwrap_or("paywatch.toml");

        let config: PaywatchConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("PAYWATCH_").split("_"))
            .extract()
            .map_err(|e| crate::error::PaywatchError::Config(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_relay_contract() {
        let config = PaywatchConfig::default();
        assert_eq!(config.gateway.port, 3050);
        assert_eq!(config.frontend.dev_origin, "http://localhost:5174");
        assert!(!config.frontend.production);
    }

    #[test]
    fn authoritative_origin_follows_production_flag() {
        let mut frontend = FrontendConfig {
            prod_origin: Some("https://dash.example.com".to_string()),
            ..FrontendConfig::default()
        };
        assert_eq!(frontend.authoritative_origin(), "http://localhost:5174");

        frontend.production = true;
        assert_eq!(frontend.authoritative_origin(), "https://dash.example.com");
    }

    #[test]
    fn allow_list_covers_both_origins() {
        let frontend = FrontendConfig {
            prod_origin: Some("https://dash.example.com".to_string()),
            ..FrontendConfig::default()
        };
        assert!(frontend.is_allowed("http://localhost:5174"));
        assert!(frontend.is_allowed("https://dash.example.com"));
        assert!(!frontend.is_allowed("https://evil.example.com"));
    }
}
