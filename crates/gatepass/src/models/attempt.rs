use iso8601_timestamp::Timestamp;

use super::{Coordinates, TicketSummary};

/// Identity and circumstances of the scanning device
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct ScannerContext {
    /// Scanner identifier
    pub scanner_id: String,

    /// Scanner's reported coordinates
    pub location: Option<Coordinates>,

    /// Resolved remote IP
    pub ip_address: Option<String>,
}

/// How a presented token was classified
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub enum VerifyOutcome {
    /// Token does not resolve to any ticket
    NotFound,

    /// Ticket was already redeemed
    AlreadyUsed,

    /// Token resolved but its window has passed
    Expired,

    /// Entry granted
    Valid,
}

/// Audit record of a single scan
///
/// Appended on every verification call, whatever the outcome; records
/// are never mutated or deleted.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct VerificationAttempt {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// Token exactly as presented, resolvable or not
    pub token: String,

    /// Ticket the token resolved to, if any
    pub ticket_id: Option<String>,

    /// Scanner that submitted the token
    pub scanner: ScannerContext,

    /// Classification of this scan
    pub outcome: VerifyOutcome,

    /// Time of the scan
    pub attempted_at: Timestamp,
}

/// Result returned to the scanner
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct Verification {
    /// Scan classification
    pub outcome: VerifyOutcome,

    /// Ticket details, present when entry is granted
    pub ticket: Option<TicketSummary>,
}
