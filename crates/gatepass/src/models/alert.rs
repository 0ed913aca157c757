use iso8601_timestamp::Timestamp;

/// Category of flagged behaviour
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    /// Same token value presented repeatedly within the window
    SuspiciousActivity,

    /// One ticket scanned with stale tokens across reissues
    TokenPolling,
}

/// Advisory alert for operator review
///
/// Raised by the fraud monitor; never blocks a verification.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct FraudAlert {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// Token that triggered the alert
    pub token: String,

    /// Ticket involved, when the token resolved to one
    pub ticket_id: Option<String>,

    /// Behaviour that was flagged
    pub category: AlertCategory,

    /// Description for operators
    pub description: String,

    /// Time the alert was raised
    pub raised_at: Timestamp,
}
