use iso8601_timestamp::Timestamp;

use crate::models::FraudAlert;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "event_type")]
pub enum GatepassEvent {
    IssueToken {
        ticket_id: String,
        expiry: Timestamp,
    },
    RedeemTicket {
        ticket_id: String,
        scanner_id: String,
    },
    TransferTicket {
        ticket_id: String,
        owner_id: String,
    },
    RaiseAlert {
        alert: FraudAlert,
    },
}
