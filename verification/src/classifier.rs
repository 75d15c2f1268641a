//! Verification Classifier state machine.
//!
//! ```text
//!            InvalidFormat | NotFound
//!   Pending ─────────────────────────▶ Invalid
//!      │    RecordMissing | LookupFailed
//!      ├────────────────────────────────▶ Suspicious
//!      │    Found
//!      └────────────────────────────────▶ Genuine
//! ```
//!
//! Every terminal state is final; a second event is refused.

use serde::{Deserialize, Serialize};

use certum_types::{CertificateDetails, Cluster, LedgerId, VerificationStatus};

use crate::ClassifierError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationPhase {
    Pending,
    Genuine,
    Suspicious,
    Invalid,
}

impl VerificationPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The verdict status for a terminal phase.
    pub fn status(&self) -> Option<VerificationStatus> {
        match self {
            Self::Pending => None,
            Self::Genuine => Some(VerificationStatus::Genuine),
            Self::Suspicious => Some(VerificationStatus::Suspicious),
            Self::Invalid => Some(VerificationStatus::Invalid),
        }
    }
}

/// What a pipeline stage observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifierEvent {
    /// The resolver rejected the input.
    InvalidFormat,
    /// Nothing exists on the ledger at the identifier.
    NotFound { id: LedgerId, cluster: Cluster },
    /// An account exists but carries no certificate record.
    RecordMissing { id: LedgerId, cause: String },
    /// The ledger could not be asked.
    LookupFailed { id: LedgerId, cause: String },
    /// A certificate record exists; details come from reconciliation.
    Found(Box<CertificateDetails>),
}

/// Drives one verification request from `Pending` to a verdict.
#[derive(Clone, Debug)]
pub struct VerificationClassifier {
    phase: VerificationPhase,
    diagnostic: Option<String>,
    certificate: Option<CertificateDetails>,
}

impl VerificationClassifier {
    pub fn new() -> Self {
        Self {
            phase: VerificationPhase::Pending,
            diagnostic: None,
            certificate: None,
        }
    }

    pub fn phase(&self) -> VerificationPhase {
        self.phase
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn certificate(&self) -> Option<&CertificateDetails> {
        self.certificate.as_ref()
    }

    /// Apply `event` and return the resulting terminal status.
    pub fn apply(&mut self, event: ClassifierEvent) -> Result<VerificationStatus, ClassifierError> {
        if self.phase.is_terminal() {
            return Err(ClassifierError::AlreadyTerminal(self.phase));
        }

        let (phase, diagnostic) = match event {
            ClassifierEvent::InvalidFormat => (
                VerificationPhase::Invalid,
                Some("Invalid Product ID format.".to_string()),
            ),
            ClassifierEvent::NotFound { id, cluster } => (
                VerificationPhase::Invalid,
                Some(format!("Mint account {id} not found on {cluster}")),
            ),
            ClassifierEvent::RecordMissing { id, cause }
            | ClassifierEvent::LookupFailed { id, cause } => (
                VerificationPhase::Suspicious,
                Some(format!("Failed to verify {}...: {cause}", id.short())),
            ),
            ClassifierEvent::Found(details) => {
                self.certificate = Some(*details);
                (VerificationPhase::Genuine, None)
            }
        };

        self.phase = phase;
        self.diagnostic = diagnostic;
        Ok(match phase {
            VerificationPhase::Genuine => VerificationStatus::Genuine,
            VerificationPhase::Suspicious => VerificationStatus::Suspicious,
            _ => VerificationStatus::Invalid,
        })
    }

    /// Consume the classifier, yielding the verdict parts.
    pub fn into_parts(self) -> (VerificationPhase, Option<CertificateDetails>, Option<String>) {
        (self.phase, self.certificate, self.diagnostic)
    }
}

impl Default for VerificationClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CertificateDetails {
        CertificateDetails {
            ledger_id: LedgerId::new("6yHknown"),
            name: "Solana Headphones".into(),
            description: None,
            image: None,
            serial: "SH-001".into(),
            category: "Electronics".into(),
            issuing_authority: LedgerId::new("brand"),
            metadata_uri: "ipfs://QmDoc".into(),
            mutable: true,
            degraded: false,
            degraded_reason: None,
        }
    }

    #[test]
    fn starts_pending() {
        let c = VerificationClassifier::new();
        assert_eq!(c.phase(), VerificationPhase::Pending);
        assert_eq!(c.phase().status(), None);
    }

    #[test]
    fn malformed_input_is_invalid() {
        let mut c = VerificationClassifier::new();
        assert_eq!(
            c.apply(ClassifierEvent::InvalidFormat).unwrap(),
            VerificationStatus::Invalid
        );
        assert_eq!(c.diagnostic(), Some("Invalid Product ID format."));
    }

    #[test]
    fn absence_is_invalid_and_names_the_cluster() {
        let mut c = VerificationClassifier::new();
        let status = c
            .apply(ClassifierEvent::NotFound {
                id: LedgerId::new("6yHvalidButUnknown"),
                cluster: Cluster::Devnet,
            })
            .unwrap();
        assert_eq!(status, VerificationStatus::Invalid);
        assert_eq!(
            c.diagnostic(),
            Some("Mint account 6yHvalidButUnknown not found on devnet")
        );
    }

    #[test]
    fn lookup_faults_are_suspicious_with_cause() {
        let mut c = VerificationClassifier::new();
        let status = c
            .apply(ClassifierEvent::LookupFailed {
                id: LedgerId::new("6yHknownMint"),
                cause: "ledger RPC timed out".into(),
            })
            .unwrap();
        assert_eq!(status, VerificationStatus::Suspicious);
        assert_eq!(
            c.diagnostic(),
            Some("Failed to verify 6yHknown...: ledger RPC timed out")
        );
    }

    #[test]
    fn found_record_is_genuine() {
        let mut c = VerificationClassifier::new();
        let status = c.apply(ClassifierEvent::Found(Box::new(details()))).unwrap();
        assert_eq!(status, VerificationStatus::Genuine);
        assert_eq!(c.certificate().unwrap().serial, "SH-001");
        assert!(c.diagnostic().is_none());
    }

    #[test]
    fn terminal_states_refuse_further_events() {
        let mut c = VerificationClassifier::new();
        c.apply(ClassifierEvent::InvalidFormat).unwrap();
        let err = c
            .apply(ClassifierEvent::Found(Box::new(details())))
            .unwrap_err();
        assert_eq!(err, ClassifierError::AlreadyTerminal(VerificationPhase::Invalid));
        assert_eq!(c.phase(), VerificationPhase::Invalid);
    }
}
