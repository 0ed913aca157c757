use iso8601_timestamp::{Duration, Timestamp};

use crate::{
    models::{Coordinates, IssuedToken, Ticket, VerificationToken},
    util::{derive_token, great_circle_metres, seconds_remaining},
    Error, Gatepass, GatepassEvent, Result, Success,
};

impl Ticket {
    /// Mint a new ticket for an event
    pub async fn new(gatepass: &Gatepass, event_id: String, owner_id: String) -> Result<Ticket> {
        let ticket = Ticket {
            id: ulid::Ulid::new().to_string(),
            event_id,
            owner_id,
            used: false,
            verification: None,
            last_issued_at: None,
        };

        ticket.save(gatepass).await?;
        Ok(ticket)
    }

    /// Save model
    pub async fn save(&self, gatepass: &Gatepass) -> Success {
        gatepass.database.save_ticket(self).await
    }

    /// Distance from the holder to the event venue, where both ends
    /// are known
    async fn venue_distance(
        &self,
        gatepass: &Gatepass,
        location: Option<Coordinates>,
    ) -> Result<Option<f64>> {
        match location {
            Some(holder) => {
                let event = gatepass.database.find_event(&self.event_id).await?;
                Ok(event
                    .venue_location
                    .map(|venue| great_circle_metres(holder, venue)))
            }
            None => Ok(None),
        }
    }

    /// Issue a verification token for this ticket
    ///
    /// While a live token is attached this returns it unchanged, so a
    /// wallet polling for its QR code always renders the same one.
    /// Otherwise a new token is derived and attached, replacing
    /// whichever token the ticket carried when we looked.
    pub async fn issue_token(
        &mut self,
        gatepass: &Gatepass,
        requester_id: &str,
        location: Option<Coordinates>,
    ) -> Result<IssuedToken> {
        if self.owner_id != requester_id {
            return Err(Error::Unauthorized);
        }

        let distance = self.venue_distance(gatepass, location).await?;
        let window = gatepass.config.token_expiry.window_secs(distance);

        // Retry if another issuer swaps the token under us
        for _ in 0..3 {
            if self.used {
                return Err(Error::AlreadyUsed);
            }

            let now = Timestamp::now_utc();

            // Re-present the live token
            if let Some(verification) = &self.verification {
                if verification.is_live(now) {
                    return Ok(IssuedToken {
                        token: verification.token.clone(),
                        expiry: verification.expiry,
                        seconds_remaining: seconds_remaining(verification.expiry, now),
                    });
                }
            }

            let previous = self
                .verification
                .as_ref()
                .map(|verification| verification.token.clone());

            let replacement = VerificationToken {
                token: derive_token(&self.id, now, &nanoid!(32)),
                expiry: now + Duration::seconds(window as i64),
            };

            if gatepass
                .database
                .swap_ticket_token(&self.id, previous.as_deref(), &replacement, now)
                .await?
            {
                self.verification = Some(replacement.clone());
                self.last_issued_at = Some(now);

                gatepass
                    .publish_event(GatepassEvent::IssueToken {
                        ticket_id: self.id.clone(),
                        expiry: replacement.expiry,
                    })
                    .await;

                return Ok(IssuedToken {
                    token: replacement.token,
                    expiry: replacement.expiry,
                    seconds_remaining: seconds_remaining(replacement.expiry, now),
                });
            }

            // Lost the race, reload and reconsider
            *self = gatepass.database.find_ticket(&self.id).await?;
        }

        Err(Error::OperationFailed)
    }

    /// Move this ticket to a new owner
    pub async fn transfer(&mut self, gatepass: &Gatepass, new_owner_id: String) -> Success {
        if self.used {
            return Err(Error::AlreadyUsed);
        }

        // Tokens issued to the previous owner must stop resolving
        self.owner_id = new_owner_id;
        self.verification = None;
        self.save(gatepass).await?;

        gatepass
            .publish_event(GatepassEvent::TransferTicket {
                ticket_id: self.id.clone(),
                owner_id: self.owner_id.clone(),
            })
            .await;

        Ok(())
    }
}
