//! Gateway client configuration.
//!
//! Selects the gateway endpoint and transport limits. Defaults point to the
//! test (pilot) gateway. Override via environment variables or explicit
//! construction. Merchant credentials are deliberately not part of this
//! type; they travel inside each payload.

use std::fmt;
use std::str::FromStr;

use url::Url;

/// Production gateway.
pub const LIVE_ENDPOINT: &str = "https://payflowpro.paypal.com";
/// Pilot (sandbox) gateway.
pub const TEST_ENDPOINT: &str = "https://pilot-payflowpro.paypal.com";
/// Client certification identifier sent in `X-VPS-VIT-Client-Certification-Id`.
pub const DEFAULT_CERTIFICATION_ID: &str = "33baf5893fc2123d8b191d2d011b7fdc";

const DEFAULT_TIMEOUT_SECS: u64 = 45;
const DEFAULT_CLIENT_TIMEOUT_HINT_SECS: u64 = 30;

/// Which gateway a configuration targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Test,
    Live,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Test => TEST_ENDPOINT,
            Self::Live => LIVE_ENDPOINT,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" | "pilot" | "sandbox" => Ok(Self::Test),
            "live" | "production" | "prod" => Ok(Self::Live),
            _ => Err(ConfigError::InvalidValue {
                name: "environment".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration for connecting to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub environment: Environment,
    /// POST target. Defaults to the environment's gateway.
    pub endpoint: Url,
    /// Whole-request timeout enforced by the client.
    pub timeout_secs: u64,
    /// Value of `X-VPS-Timeout`: how long the gateway should wait on the
    /// processor. Keep it below `timeout_secs`.
    pub client_timeout_hint_secs: u64,
    pub certification_id: String,
    /// Skip TLS certificate verification. Refused for [`Environment::Live`].
    pub accept_invalid_certs: bool,
}

impl GatewayConfig {
    /// Default configuration for `environment`.
    pub fn for_environment(environment: Environment) -> Result<Self, ConfigError> {
        Ok(Self {
            environment,
            endpoint: parse_url("endpoint", environment.default_endpoint())?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client_timeout_hint_secs: DEFAULT_CLIENT_TIMEOUT_HINT_SECS,
            certification_id: DEFAULT_CERTIFICATION_ID.to_string(),
            accept_invalid_certs: false,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PAYFLOW_ENVIRONMENT` (`test` | `live`, default: `test`)
    /// - `PAYFLOW_ENDPOINT` (default: the environment's gateway)
    /// - `PAYFLOW_TIMEOUT_SECS` (default: 45)
    /// - `PAYFLOW_ACCEPT_INVALID_CERTS` (`true` | `false`, default: `false`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("PAYFLOW_ENVIRONMENT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PAYFLOW_ENVIRONMENT".to_string(),
                value: raw,
            })?,
            None => Environment::default(),
        };
        let mut config = Self::for_environment(environment)?;

        if let Some(raw) = lookup("PAYFLOW_ENDPOINT") {
            config.endpoint = parse_url("PAYFLOW_ENDPOINT", &raw)?;
        }
        if let Some(raw) = lookup("PAYFLOW_TIMEOUT_SECS") {
            config.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PAYFLOW_TIMEOUT_SECS".to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("PAYFLOW_ACCEPT_INVALID_CERTS") {
            config.accept_invalid_certs = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                name: "PAYFLOW_ACCEPT_INVALID_CERTS".to_string(),
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local_mock(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::Test,
            endpoint: parse_url("local_mock", base_url)?,
            timeout_secs: 5,
            client_timeout_hint_secs: DEFAULT_CLIENT_TIMEOUT_HINT_SECS,
            certification_id: DEFAULT_CERTIFICATION_ID.to_string(),
            accept_invalid_certs: false,
        })
    }

    /// Check cross-field constraints. Called before a transport is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accept_invalid_certs && self.environment == Environment::Live {
            return Err(ConfigError::InsecureLive);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
    #[error("TLS certificate verification cannot be disabled for the live gateway")]
    InsecureLive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn environment_endpoints() {
        let test = GatewayConfig::for_environment(Environment::Test).unwrap();
        assert_eq!(test.endpoint.as_str(), "https://pilot-payflowpro.paypal.com/");
        let live = GatewayConfig::for_environment(Environment::Live).unwrap();
        assert_eq!(live.endpoint.as_str(), "https://payflowpro.paypal.com/");
        assert_eq!(live.timeout_secs, 45);
        assert_eq!(live.client_timeout_hint_secs, 30);
        assert!(!live.accept_invalid_certs);
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("LIVE".parse::<Environment>().unwrap(), Environment::Live);
        assert_eq!("pilot".parse::<Environment>().unwrap(), Environment::Test);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn lookup_defaults_to_test_gateway() {
        let cfg = GatewayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.environment, Environment::Test);
        assert_eq!(cfg.endpoint.as_str(), "https://pilot-payflowpro.paypal.com/");
    }

    #[test]
    fn lookup_applies_overrides() {
        let cfg = GatewayConfig::from_lookup(lookup(&[
            ("PAYFLOW_ENVIRONMENT", "live"),
            ("PAYFLOW_ENDPOINT", "https://gateway.internal:8443"),
            ("PAYFLOW_TIMEOUT_SECS", "10"),
        ]))
        .unwrap();
        assert_eq!(cfg.environment, Environment::Live);
        assert_eq!(cfg.endpoint.as_str(), "https://gateway.internal:8443/");
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn lookup_rejects_bad_values() {
        assert!(matches!(
            GatewayConfig::from_lookup(lookup(&[("PAYFLOW_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            GatewayConfig::from_lookup(lookup(&[("PAYFLOW_ENDPOINT", "not a url")])),
            Err(ConfigError::InvalidUrl(..))
        ));
        assert!(matches!(
            GatewayConfig::from_lookup(lookup(&[("PAYFLOW_ENVIRONMENT", "staging")])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn insecure_tls_refused_for_live() {
        let result = GatewayConfig::from_lookup(lookup(&[
            ("PAYFLOW_ENVIRONMENT", "live"),
            ("PAYFLOW_ACCEPT_INVALID_CERTS", "true"),
        ]));
        assert!(matches!(result, Err(ConfigError::InsecureLive)));

        let test = GatewayConfig::from_lookup(lookup(&[("PAYFLOW_ACCEPT_INVALID_CERTS", "yes")]))
            .unwrap();
        assert!(test.accept_invalid_certs);
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut cfg = GatewayConfig::for_environment(Environment::Test).unwrap();
        cfg.timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = GatewayConfig::local_mock("http://127.0.0.1:9000").unwrap();
        assert_eq!(cfg.endpoint.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.timeout_secs, 5);
        assert!(GatewayConfig::local_mock("::nope").is_err());
    }
}
