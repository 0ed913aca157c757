use bson::{to_bson, to_document, Document};
use futures::stream::TryStreamExt;
use iso8601_timestamp::Timestamp;
use mongodb::options::UpdateOptions;
use std::ops::Deref;

use crate::{
    models::{Event, FraudAlert, Ticket, VerificationAttempt, VerificationToken, VerifyOutcome},
    Error, Result, Success,
};

use super::{definition::AbstractDatabase, Migration};

#[derive(Clone)]
pub struct MongoDb(pub mongodb::Database);

impl Deref for MongoDb {
    type Target = mongodb::Database;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl AbstractDatabase for MongoDb {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success {
        match migration {
            #[cfg(debug_assertions)]
            Migration::WipeAll => {
                // Drop the entire database
                self.drop().await.unwrap();
            }
            Migration::M2026_08_10EnsureUpToSpec => {
                if self
                    .collection::<Document>("tickets")
                    .list_index_names()
                    .await
                    .unwrap_or_default()
                    .contains(&"verification_token".to_owned())
                {
                    return Ok(());
                }

                // Make sure all collections exist
                let list = self.list_collection_names().await.unwrap();
                let collections = ["events", "tickets", "verification_attempts", "fraud_alerts"];

                for name in collections {
                    if !list.contains(&name.to_string()) {
                        self.create_collection(name).await.unwrap();
                    }
                }

                // Setup index for `tickets`
                let col = self.collection::<Document>("tickets");
                col.drop_indexes().await.unwrap();

                self.run_command(doc! {
                    "createIndexes": "tickets",
                    "indexes": [
                        {
                            "key": {
                                "verification.token": 1
                            },
                            "name": "verification_token",
                            "unique": true,
                            "sparse": true
                        },
                        {
                            "key": {
                                "owner_id": 1
                            },
                            "name": "owner_id"
                        }
                    ]
                })
                .await
                .unwrap();

                // Setup index for `verification_attempts`
                let col = self.collection::<Document>("verification_attempts");
                col.drop_indexes().await.unwrap();

                self.run_command(doc! {
                    "createIndexes": "verification_attempts",
                    "indexes": [
                        {
                            "key": {
                                "token": 1,
                                "attempted_at": 1
                            },
                            "name": "token_window"
                        },
                        {
                            "key": {
                                "ticket_id": 1,
                                "attempted_at": 1
                            },
                            "name": "ticket_window"
                        }
                    ]
                })
                .await
                .unwrap();

                // Setup index for `fraud_alerts`
                let col = self.collection::<Document>("fraud_alerts");
                col.drop_indexes().await.unwrap();

                self.run_command(doc! {
                    "createIndexes": "fraud_alerts",
                    "indexes": [
                        {
                            "key": {
                                "raised_at": 1
                            },
                            "name": "raised_at"
                        }
                    ]
                })
                .await
                .unwrap();
            }
        }

        Ok(())
    }

    /// Find event by id
    async fn find_event(&self, id: &str) -> Result<Event> {
        self.collection("events")
            .find_one(doc! {
                "_id": id
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "event",
            })?
            .ok_or(Error::UnknownEvent)
    }

    /// Find ticket by id
    async fn find_ticket(&self, id: &str) -> Result<Ticket> {
        self.collection("tickets")
            .find_one(doc! {
                "_id": id
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "ticket",
            })?
            .ok_or(Error::UnknownTicket)
    }

    /// Find ticket by attached verification token
    async fn find_ticket_by_token(&self, token: &str) -> Result<Option<Ticket>> {
        self.collection("tickets")
            .find_one(doc! {
                "verification.token": token
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "ticket",
            })
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
        let query = match previous {
            Some(token) => doc! {
                "_id": ticket_id,
                "used": { "$ne": true },
                "verification.token": token
            },
            // Matches a missing or null verification
            None => doc! {
                "_id": ticket_id,
                "used": { "$ne": true },
                "verification": null
            },
        };

        self.collection::<Ticket>("tickets")
            .update_one(
                query,
                doc! {
                    "$set": {
                        "verification": to_document(replacement).map_err(|_| {
                            Error::DatabaseError {
                                operation: "to_document",
                                with: "verification",
                            }
                        })?,
                        "last_issued_at": issued_at.format().to_string()
                    }
                },
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "update_one",
                with: "ticket",
            })
            .map(|result| result.matched_count == 1)
    }

    /// Mark a ticket as used if it is unused and still carries the
    /// given token
    async fn consume_ticket_token(&self, ticket_id: &str, token: &str) -> Result<bool> {
        self.collection::<Ticket>("tickets")
            .update_one(
                doc! {
                    "_id": ticket_id,
                    "used": { "$ne": true },
                    "verification.token": token
                },
                doc! {
                    "$set": {
                        "used": true
                    }
                },
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "update_one",
                with: "ticket",
            })
            .map(|result| result.matched_count == 1)
    }

    /// Count verification attempts for a token since a point in time
    async fn count_attempts_for_token(&self, token: &str, since: Timestamp) -> Result<u64> {
        self.collection::<VerificationAttempt>("verification_attempts")
            .count_documents(doc! {
                "token": token,
                "attempted_at": {
                    "$gte": since.format().to_string()
                }
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "count_documents",
                with: "verification_attempts",
            })
    }

    /// Count verification attempts against a ticket with a given
    /// outcome since a point in time
    async fn count_ticket_attempts_with_outcome(
        &self,
        ticket_id: &str,
        outcome: VerifyOutcome,
        since: Timestamp,
    ) -> Result<u64> {
        self.collection::<VerificationAttempt>("verification_attempts")
            .count_documents(doc! {
                "ticket_id": ticket_id,
                "outcome": to_bson(&outcome).map_err(|_| Error::DatabaseError {
                    operation: "to_bson",
                    with: "outcome",
                })?,
                "attempted_at": {
                    "$gte": since.format().to_string()
                }
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "count_documents",
                with: "verification_attempts",
            })
    }

    /// Find fraud alerts raised at or after a point in time
    async fn find_alerts_since(&self, since: Option<Timestamp>) -> Result<Vec<FraudAlert>> {
        let query = match since {
            Some(since) => doc! {
                "raised_at": {
                    "$gte": since.format().to_string()
                }
            },
            None => doc! {},
        };

        self.collection::<FraudAlert>("fraud_alerts")
            .find(query)
            .sort(doc! {
                "_id": 1
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find",
                with: "fraud_alerts",
            })?
            .try_collect()
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "collect",
                with: "fraud_alerts",
            })
    }

    /// Save event
    async fn save_event(&self, event: &Event) -> Success {
        self.collection::<Event>("events")
            .update_one(
                doc! {
                    "_id": &event.id
                },
                doc! {
                    "$set": to_document(event).map_err(|_| Error::DatabaseError {
                        operation: "to_document",
                        with: "event",
                    })?
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "event",
            })
            .map(|_| ())
    }

    /// Save ticket
    async fn save_ticket(&self, ticket: &Ticket) -> Success {
        self.collection::<Ticket>("tickets")
            .update_one(
                doc! {
                    "_id": &ticket.id
                },
                doc! {
                    "$set": to_document(ticket).map_err(|_| Error::DatabaseError {
                        operation: "to_document",
                        with: "ticket",
                    })?
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "ticket",
            })
            .map(|_| ())
    }

    /// Save verification attempt
    async fn save_attempt(&self, attempt: &VerificationAttempt) -> Success {
        self.collection::<VerificationAttempt>("verification_attempts")
            .insert_one(attempt)
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "insert_one",
                with: "verification_attempt",
            })
            .map(|_| ())
    }

    /// Save fraud alert
    async fn save_alert(&self, alert: &FraudAlert) -> Success {
        self.collection::<FraudAlert>("fraud_alerts")
            .insert_one(alert)
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "insert_one",
                with: "fraud_alert",
            })
            .map(|_| ())
    }
}
