//! The on-ledger token record that anchors a certificate.

use serde::{Deserialize, Serialize};

use crate::LedgerId;

/// A certificate token as read back from the ledger.
///
/// Created once per certificate at mint time and never deleted. When
/// `mutable` is set only `issuing_authority` may update it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub ledger_id: LedgerId,
    /// On-chain display name.
    pub name: String,
    pub symbol: String,
    /// URI of the metadata document this token was minted against.
    pub metadata_uri: String,
    /// The update authority (the issuing brand's wallet).
    pub issuing_authority: LedgerId,
    pub mutable: bool,
    /// Metadata JSON, when the ledger client could load it eagerly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded_metadata: Option<String>,
}
