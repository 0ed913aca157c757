use iso8601_timestamp::Timestamp;

use crate::{
    models::{Event, FraudAlert, Ticket, VerificationAttempt, VerificationToken, VerifyOutcome},
    Error, Result, Success,
};

use futures::lock::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::{definition::AbstractDatabase, Migration};

#[derive(Default, Clone)]
pub struct DummyDb {
    pub events: Arc<Mutex<HashMap<String, Event>>>,
    pub tickets: Arc<Mutex<HashMap<String, Ticket>>>,
    pub attempts: Arc<Mutex<HashMap<String, VerificationAttempt>>>,
    pub alerts: Arc<Mutex<HashMap<String, FraudAlert>>>,
}

#[async_trait]
impl AbstractDatabase for DummyDb {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success {
        println!("skip migration {:?}", migration);
        Ok(())
    }

    /// Find event by id
    async fn find_event(&self, id: &str) -> Result<Event> {
        let events = self.events.lock().await;
        events.get(id).cloned().ok_or(Error::UnknownEvent)
    }

    /// Find ticket by id
    async fn find_ticket(&self, id: &str) -> Result<Ticket> {
        let tickets = self.tickets.lock().await;
        tickets.get(id).cloned().ok_or(Error::UnknownTicket)
    }

    /// Find ticket by attached verification token
    async fn find_ticket_by_token(&self, token: &str) -> Result<Option<Ticket>> {
        let tickets = self.tickets.lock().await;
        Ok(tickets
            .values()
            .find(|ticket| {
                ticket
                    .verification
                    .as_ref()
                    .map(|verification| verification.token == token)
                    .unwrap_or(false)
            })
            .cloned())
    }

    /// Attach a verification token to an unused ticket if its current
    /// token still matches `previous`
    async fn swap_ticket_token(
        &self,
        ticket_id: &str,
        previous: Option<&str>,
        replacement: &VerificationToken,
        issued_at: Timestamp,
    ) -> Result<bool> {
        let mut tickets = self.tickets.lock().await;
        if let Some(ticket) = tickets.get_mut(ticket_id) {
            let current = ticket
                .verification
                .as_ref()
                .map(|verification| verification.token.as_str());

            if !ticket.used && current == previous {
                ticket.verification = Some(replacement.clone());
                ticket.last_issued_at = Some(issued_at);
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Mark a ticket as used if it is unused and still carries the
    /// given token
    async fn consume_ticket_token(&self, ticket_id: &str, token: &str) -> Result<bool> {
        let mut tickets = self.tickets.lock().await;
        if let Some(ticket) = tickets.get_mut(ticket_id) {
            let holds_token = ticket
                .verification
                .as_ref()
                .map(|verification| verification.token == token)
                .unwrap_or(false);

            if !ticket.used && holds_token {
                ticket.used = true;
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Count verification attempts for a token since a point in time
    async fn count_attempts_for_token(&self, token: &str, since: Timestamp) -> Result<u64> {
        let attempts = self.attempts.lock().await;
        Ok(attempts
            .values()
            .filter(|attempt| {
                attempt.token == token
                    && attempt.attempted_at.to_unix_timestamp_ms() >= since.to_unix_timestamp_ms()
            })
            .count() as u64)
    }

    /// Count verification attempts against a ticket with a given
    /// outcome since a point in time
    async fn count_ticket_attempts_with_outcome(
        &self,
        ticket_id: &str,
        outcome: VerifyOutcome,
        since: Timestamp,
    ) -> Result<u64> {
        let attempts = self.attempts.lock().await;
        Ok(attempts
            .values()
            .filter(|attempt| {
                attempt.ticket_id.as_deref() == Some(ticket_id)
                    && attempt.outcome == outcome
                    && attempt.attempted_at.to_unix_timestamp_ms() >= since.to_unix_timestamp_ms()
            })
            .count() as u64)
    }

    /// Find fraud alerts raised at or after a point in time
    async fn find_alerts_since(&self, since: Option<Timestamp>) -> Result<Vec<FraudAlert>> {
        let alerts = self.alerts.lock().await;
        let mut alerts: Vec<FraudAlert> = alerts
            .values()
            .filter(|alert| {
                since
                    .map(|since| {
                        alert.raised_at.to_unix_timestamp_ms() >= since.to_unix_timestamp_ms()
                    })
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        alerts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(alerts)
    }

    /// Save event
    async fn save_event(&self, event: &Event) -> Success {
        let mut events = self.events.lock().await;
        events.insert(event.id.to_string(), event.clone());
        Ok(())
    }

    /// Save ticket
    async fn save_ticket(&self, ticket: &Ticket) -> Success {
        let mut tickets = self.tickets.lock().await;
        tickets.insert(ticket.id.to_string(), ticket.clone());
        Ok(())
    }

    /// Save verification attempt
    async fn save_attempt(&self, attempt: &VerificationAttempt) -> Success {
        let mut attempts = self.attempts.lock().await;
        attempts.insert(attempt.id.to_string(), attempt.clone());
        Ok(())
    }

    /// Save fraud alert
    async fn save_alert(&self, alert: &FraudAlert) -> Success {
        let mut alerts = self.alerts.lock().await;
        alerts.insert(alert.id.to_string(), alert.clone());
        Ok(())
    }
}
