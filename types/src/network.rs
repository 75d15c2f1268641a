//! Ledger cluster identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CertumError;

/// Identifies which Solana cluster certificates are anchored on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    /// The production cluster.
    MainnetBeta,
    /// The public test cluster.
    Testnet,
    /// The public development cluster.
    Devnet,
    /// A local validator.
    Localnet,
}

impl Cluster {
    /// Default JSON-RPC endpoint for this cluster.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Human-readable name, also the explorer `cluster` query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "mainnet-beta",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
            Self::Localnet => "localnet",
        }
    }

    /// Block-explorer page for an address on this cluster.
    pub fn explorer_url(&self, address: &str) -> String {
        match self {
            Self::MainnetBeta => format!("https://explorer.solana.com/address/{address}"),
            Self::Localnet => format!(
                "https://explorer.solana.com/address/{address}?cluster=custom&customUrl=http%3A%2F%2F127.0.0.1%3A8899"
            ),
            other => format!(
                "https://explorer.solana.com/address/{address}?cluster={}",
                other.as_str()
            ),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = CertumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Self::MainnetBeta),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            "localnet" | "local" => Ok(Self::Localnet),
            _ => Err(CertumError::UnknownCluster(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_url_carries_cluster() {
        assert_eq!(
            Cluster::Devnet.explorer_url("abc"),
            "https://explorer.solana.com/address/abc?cluster=devnet"
        );
        assert_eq!(
            Cluster::MainnetBeta.explorer_url("abc"),
            "https://explorer.solana.com/address/abc"
        );
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("mainnet".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert_eq!("DEVNET".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert!("moonnet".parse::<Cluster>().is_err());
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Cluster::MainnetBeta).unwrap();
        assert_eq!(json, "\"mainnet-beta\"");
    }
}
