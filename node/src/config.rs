//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use certum_crypto::IdentifierGrammar;
use certum_issuance::IssuerConfig;
use certum_ledger::{AnchorConfig, Commitment};
use certum_store::PinataConfig;
use certum_types::Cluster;
use certum_utils::LogFormat;
use certum_verification::DEFAULT_QUERY_PARAMS;

use crate::NodeError;

/// Environment variable consulted when no Pinata JWT is configured.
pub const PINATA_JWT_ENV: &str = "CERTUM_PINATA_JWT";

/// Configuration for a certum engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Which Solana cluster certificates live on.
    #[serde(default = "default_cluster")]
    pub cluster: Cluster,

    /// RPC endpoint override; the cluster's public endpoint when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    #[serde(default)]
    pub commitment: Commitment,

    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    #[serde(default = "default_publish_timeout_secs")]
    pub publish_timeout_secs: u64,

    /// Bound on the off-chain metadata fetch during verification.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// How long issuance waits for the mint to confirm.
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    #[serde(default = "default_confirm_poll_millis")]
    pub confirm_poll_millis: u64,

    /// Symbol written into every certificate token.
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,

    /// Wallet bridge used for signing; issuance is unavailable without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_url: Option<String>,

    /// Origin of the verification front end, for deep links and QR payloads.
    #[serde(default = "default_verify_base_url")]
    pub verify_base_url: String,

    /// Query parameters that may carry the identifier in a link.
    #[serde(default = "default_identifier_params")]
    pub identifier_params: Vec<String>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Port the HTTP API listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    #[serde(default)]
    pub content_store: ContentStoreConfig,

    /// Grammar of ledger identifiers accepted by the resolver.
    #[serde(default)]
    pub grammar: IdentifierGrammar,
}

/// Pinata pinning API and IPFS gateway settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStoreConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Bearer JWT; falls back to `CERTUM_PINATA_JWT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_cluster() -> Cluster {
    Cluster::Devnet
}

fn default_rpc_timeout_secs() -> u64 {
    30
}

fn default_publish_timeout_secs() -> u64 {
    60
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_confirm_timeout_secs() -> u64 {
    60
}

fn default_confirm_poll_millis() -> u64 {
    500
}

fn default_token_symbol() -> String {
    "CERT".to_string()
}

fn default_verify_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_identifier_params() -> Vec<String> {
    DEFAULT_QUERY_PARAMS.iter().map(|p| p.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_listen_port() -> u16 {
    7080
}

fn default_api_url() -> String {
    "https://api.pinata.cloud".to_string()
}

fn default_gateway_url() -> String {
    "https://gateway.pinata.cloud".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("EngineConfig is always serializable to TOML")
    }

    /// Reject settings no engine could run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        let timeouts = [
            ("rpc_timeout_secs", self.rpc_timeout_secs),
            ("publish_timeout_secs", self.publish_timeout_secs),
            ("fetch_timeout_secs", self.fetch_timeout_secs),
            ("confirm_timeout_secs", self.confirm_timeout_secs),
            ("confirm_poll_millis", self.confirm_poll_millis),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(NodeError::Config(format!("{name} must be positive")));
            }
        }
        if self.grammar.min_len == 0 || self.grammar.min_len > self.grammar.max_len {
            return Err(NodeError::Config(format!(
                "grammar length range {}..={} is empty",
                self.grammar.min_len, self.grammar.max_len
            )));
        }
        if self.identifier_params.is_empty() {
            return Err(NodeError::Config(
                "identifier_params must name at least one parameter".into(),
            ));
        }
        Ok(())
    }

    /// The RPC endpoint: the override, or the cluster's public endpoint.
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.cluster.default_rpc_url().to_string())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn anchor_config(&self) -> AnchorConfig {
        AnchorConfig {
            confirm_timeout: Duration::from_secs(self.confirm_timeout_secs),
            poll_interval: Duration::from_millis(self.confirm_poll_millis),
            symbol: self.token_symbol.clone(),
        }
    }

    pub fn issuer_config(&self) -> IssuerConfig {
        IssuerConfig {
            publish_timeout: Duration::from_secs(self.publish_timeout_secs),
            lookup_timeout: self.rpc_timeout(),
            anchor: self.anchor_config(),
            verify_base_url: self.verify_base_url.clone(),
        }
    }

    pub fn pinata_config(&self) -> PinataConfig {
        PinataConfig {
            api_url: self.content_store.api_url.clone(),
            gateway_url: self.content_store.gateway_url.clone(),
            jwt: self.content_store.jwt(),
            timeout: Duration::from_secs(self.publish_timeout_secs),
        }
    }
}

impl ContentStoreConfig {
    /// The configured JWT, or the one in `CERTUM_PINATA_JWT`.
    pub fn jwt(&self) -> Option<String> {
        self.jwt
            .clone()
            .or_else(|| std::env::var(PINATA_JWT_ENV).ok())
            .filter(|jwt| !jwt.trim().is_empty())
    }
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            gateway_url: default_gateway_url(),
            jwt: None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster: default_cluster(),
            rpc_url: None,
            commitment: Commitment::default(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
            publish_timeout_secs: default_publish_timeout_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            confirm_timeout_secs: default_confirm_timeout_secs(),
            confirm_poll_millis: default_confirm_poll_millis(),
            token_symbol: default_token_symbol(),
            content_store: ContentStoreConfig::default(),
            signer_url: None,
            verify_base_url: default_verify_base_url(),
            identifier_params: default_identifier_params(),
            grammar: IdentifierGrammar::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            listen_port: default_listen_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certum_crypto::Alphabet;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EngineConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = EngineConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.cluster, Cluster::Devnet);
        assert_eq!(config.listen_port, 7080);
        assert_eq!(config.rpc_url(), "https://api.devnet.solana.com");
        assert_eq!(config.identifier_params, vec!["productId", "mintAddress"]);
        assert_eq!(config.grammar, IdentifierGrammar::solana());
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            cluster = "mainnet-beta"
            rpc_url = "http://127.0.0.1:8899"
            log_format = "json"
            confirm_timeout_secs = 90

            [content_store]
            gateway_url = "https://ipfs.example"

            [grammar]
            alphabet = "alphanumeric"
            min_len = 4
            max_len = 64
        "#;
        let config = EngineConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.cluster, Cluster::MainnetBeta);
        assert_eq!(config.rpc_url(), "http://127.0.0.1:8899");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.anchor_config().confirm_timeout, Duration::from_secs(90));
        assert_eq!(config.content_store.gateway_url, "https://ipfs.example");
        assert_eq!(config.content_store.api_url, "https://api.pinata.cloud");
        assert_eq!(config.grammar.alphabet, Alphabet::Alphanumeric);
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let err = EngineConfig::from_toml_str("fetch_timeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("fetch_timeout_secs"));
    }

    #[test]
    fn inverted_grammar_range_is_rejected() {
        let toml = r#"
            [grammar]
            alphabet = "alphanumeric"
            min_len = 10
            max_len = 4
        "#;
        assert!(matches!(
            EngineConfig::from_toml_str(toml),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn configured_jwt_wins() {
        let store = ContentStoreConfig {
            jwt: Some("configured".into()),
            ..ContentStoreConfig::default()
        };
        assert_eq!(store.jwt().as_deref(), Some("configured"));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = EngineConfig::from_toml_file("/nonexistent/certum.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certum.toml");
        std::fs::write(&path, "listen_port = 9090\nsigner_url = \"http://127.0.0.1:7090\"\n").unwrap();
        let config = EngineConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.listen_port, 9090);
        assert_eq!(config.signer_url.as_deref(), Some("http://127.0.0.1:7090"));
    }
}
