use iso8601_timestamp::Timestamp;

use crate::{
    models::{
        FraudAlert, ScannerContext, Ticket, TicketSummary, Verification, VerificationAttempt,
        VerifyOutcome,
    },
    Error, Gatepass, GatepassEvent, Result, Success,
};

impl VerificationAttempt {
    /// Verify a scanned token and record the attempt
    ///
    /// Outcomes are decided in order: a token no ticket carries is
    /// `NotFound`, a redeemed ticket is `AlreadyUsed` even when the
    /// token has also lapsed, a lapsed token is `Expired`, and only
    /// then is the ticket redeemed. Every scan lands on record before
    /// fraud patterns are evaluated.
    pub async fn verify(
        gatepass: &Gatepass,
        token: &str,
        scanner: ScannerContext,
    ) -> Result<Verification> {
        let now = Timestamp::now_utc();

        let (outcome, ticket_id, summary) =
            match gatepass.database.find_ticket_by_token(token).await? {
                None => (VerifyOutcome::NotFound, None, None),
                Some(ticket) if ticket.used => {
                    (VerifyOutcome::AlreadyUsed, Some(ticket.id), None)
                }
                Some(ticket) if !ticket.holds_live_token(now) => {
                    (VerifyOutcome::Expired, Some(ticket.id), None)
                }
                Some(ticket) => {
                    let (outcome, summary) = Self::redeem(gatepass, &ticket, token).await?;
                    (outcome, Some(ticket.id), summary)
                }
            };

        let attempt = VerificationAttempt {
            id: ulid::Ulid::new().to_string(),
            token: token.to_string(),
            ticket_id,
            scanner,
            outcome,
            attempted_at: now,
        };

        // The scan goes on record whatever happens next
        attempt.save(gatepass).await?;

        match outcome {
            VerifyOutcome::Valid => {
                if let Some(ticket_id) = &attempt.ticket_id {
                    gatepass
                        .publish_event(GatepassEvent::RedeemTicket {
                            ticket_id: ticket_id.clone(),
                            scanner_id: attempt.scanner.scanner_id.clone(),
                        })
                        .await;
                }
            }
            _ => {
                // Verification never fails because pattern analysis did
                if let Err(err) =
                    FraudAlert::evaluate_pattern(gatepass, token, attempt.ticket_id.as_deref())
                        .await
                {
                    error!("Failed to evaluate fraud patterns for an attempt: {:?}", err);
                }
            }
        }

        Ok(Verification {
            outcome,
            ticket: summary,
        })
    }

    /// Redeem a ticket holding a live token
    ///
    /// The event is resolved before the ticket is consumed. If another
    /// gate consumed it first, the ticket is reclassified from its
    /// current state.
    async fn redeem(
        gatepass: &Gatepass,
        ticket: &Ticket,
        token: &str,
    ) -> Result<(VerifyOutcome, Option<TicketSummary>)> {
        // A ticket pointing at a missing event record is broken data,
        // surfaced as a backend fault rather than a scan classification
        let event = match gatepass.database.find_event(&ticket.event_id).await {
            Err(Error::UnknownEvent) => Err(Error::DatabaseError {
                operation: "find_one",
                with: "event",
            }),
            event => event,
        }?;

        if gatepass
            .database
            .consume_ticket_token(&ticket.id, token)
            .await?
        {
            Ok((
                VerifyOutcome::Valid,
                Some(TicketSummary {
                    ticket_id: ticket.id.clone(),
                    event_name: event.name,
                    venue: event.venue,
                    owner_id: ticket.owner_id.clone(),
                }),
            ))
        } else {
            let ticket = gatepass.database.find_ticket(&ticket.id).await?;
            if ticket.used {
                Ok((VerifyOutcome::AlreadyUsed, None))
            } else {
                Ok((VerifyOutcome::NotFound, None))
            }
        }
    }

    /// Save model
    pub async fn save(&self, gatepass: &Gatepass) -> Success {
        gatepass.database.save_attempt(self).await
    }
}
