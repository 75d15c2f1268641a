//! Verification requests and verdicts.
//!
//! A verdict is computed fresh for every request and never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{LedgerId, Timestamp};

/// Terminal classification of a verification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// A certificate record exists on the ledger.
    Genuine,
    /// Something exists but could not be confirmed as a certificate, or the
    /// ledger could not be reached.
    Suspicious,
    /// The input is malformed or names nothing on the ledger.
    Invalid,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Genuine => "genuine",
            Self::Suspicious => "suspicious",
            Self::Invalid => "invalid",
        }
    }

    /// Heading shown alongside the verdict.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Genuine => "Genuine Product",
            Self::Suspicious => "Suspicious Product",
            Self::Invalid => "Invalid ID",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ephemeral request a verdict answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub raw_input: String,
    /// Set once the resolver accepts the input.
    pub resolved_identifier: Option<LedgerId>,
    pub timestamp: Timestamp,
}

/// Certificate attributes reconciled from the ledger record and its
/// metadata document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateDetails {
    pub ledger_id: LedgerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub serial: String,
    pub category: String,
    pub issuing_authority: LedgerId,
    pub metadata_uri: String,
    pub mutable: bool,
    /// Set when off-chain metadata could not be loaded and defaults were
    /// substituted.
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
}

/// The outcome of one verification request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub request: VerificationRequest,
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

impl Verdict {
    pub fn is_genuine(&self) -> bool {
        self.status == VerificationStatus::Genuine
    }
}
