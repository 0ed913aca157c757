use iso8601_timestamp::Timestamp;

fn is_false(t: &bool) -> bool {
    !t
}

/// Verification token bound to a ticket
///
/// Opaque value the holder's wallet renders as a QR code.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct VerificationToken {
    /// Token presented at the gate
    pub token: String,

    /// Time at which this token expires
    pub expiry: Timestamp,
}

impl VerificationToken {
    /// Whether this token is still presentable
    ///
    /// A token at its exact expiry instant is already expired.
    pub fn is_live(&self, now: Timestamp) -> bool {
        now.to_unix_timestamp_ms() < self.expiry.to_unix_timestamp_ms()
    }
}

/// Ticket model
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct Ticket {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// Event this ticket admits entry to
    pub event_id: String,

    /// Owning wallet identity
    pub owner_id: String,

    /// Whether this ticket has been redeemed at the gate
    ///
    /// Never cleared once set; a redeemed ticket keeps its last token
    /// so repeat scans of it can be told apart from unknown tokens.
    #[serde(skip_serializing_if = "is_false", default)]
    pub used: bool,

    /// Most recently issued verification token
    pub verification: Option<VerificationToken>,

    /// Time of the most recent issuance
    pub last_issued_at: Option<Timestamp>,
}

impl Ticket {
    /// Whether this ticket currently holds an unexpired token
    pub fn holds_live_token(&self, now: Timestamp) -> bool {
        self.verification
            .as_ref()
            .map(|verification| verification.is_live(now))
            .unwrap_or(false)
    }
}

/// Issuance result handed back to the holder's wallet
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct IssuedToken {
    /// Token to render as a QR code
    pub token: String,

    /// Time at which this token expires
    pub expiry: Timestamp,

    /// Whole seconds left before expiry
    pub seconds_remaining: u64,
}

/// Ticket details shown to gate staff after a valid scan
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct TicketSummary {
    pub ticket_id: String,
    pub event_name: String,
    pub venue: String,
    pub owner_id: String,
}

#[cfg(test)]
mod tests {
    use super::{Ticket, VerificationToken};
    use iso8601_timestamp::{Duration, Timestamp};

    #[test]
    fn token_dies_at_its_exact_expiry_instant() {
        let now = Timestamp::now_utc();
        let token = VerificationToken {
            token: "tok1".to_string(),
            expiry: now,
        };

        assert!(token.is_live(now - Duration::seconds(1)));
        assert!(!token.is_live(now));
        assert!(!token.is_live(now + Duration::seconds(1)));
    }

    #[test]
    fn the_used_flag_is_only_serialized_once_set() {
        let mut ticket = Ticket {
            id: "ticket".to_string(),
            event_id: "event".to_string(),
            owner_id: "wallet_alice".to_string(),
            used: false,
            verification: None,
            last_issued_at: None,
        };

        let value = serde_json::to_value(&ticket).unwrap();
        assert!(value.get("used").is_none());

        ticket.used = true;

        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value.get("used"), Some(&serde_json::Value::Bool(true)));
    }
}
