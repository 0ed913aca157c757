use iso8601_timestamp::Timestamp;

use crate::{
    models::{Event, FraudAlert, Ticket, VerificationAttempt, VerificationToken, VerifyOutcome},
    Result, Success,
};

use super::Migration;

#[async_trait]
pub trait AbstractDatabase: std::marker::Sync {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success;

    /// Find event by id
    async fn find_event(&self, id: &str) -> Result<Event>;

    /// Find ticket by id
    async fn find_ticket(&self, id: &str) -> Result<Ticket>;

    /// Find ticket by attached verification token
    async fn find_ticket_by_token(&self, token: &str) -> Result<Option<Ticket>>;

    /// Attach a verification token to an unused ticket if its current
    /// token still matches `previous`
    ///
    /// A redeemed ticket never wins the swap, so an issuer working
    /// from a stale read cannot revive it. Returns whether the swap
    /// took place.
    async fn swap_ticket_token(
        &self,
        ticket_id: &str,
        previous: Option<&str>,
        replacement: &VerificationToken,
        issued_at: Timestamp,
    ) -> Result<bool>;

    /// Mark a ticket as used if it is unused and still carries the
    /// given token
    ///
    /// The token stays attached so later scans of it resolve to the
    /// redeemed ticket. Returns whether this call redeemed the ticket.
    async fn consume_ticket_token(&self, ticket_id: &str, token: &str) -> Result<bool>;

    /// Count verification attempts for a token since a point in time
    async fn count_attempts_for_token(&self, token: &str, since: Timestamp) -> Result<u64>;

    /// Count verification attempts against a ticket with a given
    /// outcome since a point in time
    async fn count_ticket_attempts_with_outcome(
        &self,
        ticket_id: &str,
        outcome: VerifyOutcome,
        since: Timestamp,
    ) -> Result<u64>;

    /// Find fraud alerts raised at or after a point in time
    ///
    /// Alerts are returned oldest first. Without `since`, every alert
    /// on record is returned.
    async fn find_alerts_since(&self, since: Option<Timestamp>) -> Result<Vec<FraudAlert>>;

    /// Save event
    async fn save_event(&self, event: &Event) -> Success;

    /// Save ticket
    async fn save_ticket(&self, ticket: &Ticket) -> Success;

    /// Save verification attempt
    async fn save_attempt(&self, attempt: &VerificationAttempt) -> Success;

    /// Save fraud alert
    async fn save_alert(&self, alert: &FraudAlert) -> Success;
}
