use iso8601_timestamp::{Duration, Timestamp};

use crate::{
    config::FraudDetection,
    models::{AlertCategory, FraudAlert, VerifyOutcome},
    Gatepass, GatepassEvent, Result, Success,
};

impl FraudAlert {
    /// Evaluate fraud patterns around a failed verification attempt
    ///
    /// Counts look back over the configured window, including the
    /// attempt that triggered this evaluation. Returns the alerts
    /// raised, which may be empty.
    pub async fn evaluate_pattern(
        gatepass: &Gatepass,
        token: &str,
        ticket_id: Option<&str>,
    ) -> Result<Vec<FraudAlert>> {
        let (window_secs, repeat_threshold, polling_threshold) =
            match &gatepass.config.fraud_detection {
                FraudDetection::Disabled => return Ok(vec![]),
                FraudDetection::Enabled {
                    window_secs,
                    repeat_threshold,
                    polling_threshold,
                } => (*window_secs, *repeat_threshold, *polling_threshold),
            };

        let since = Timestamp::now_utc() - Duration::seconds(window_secs as i64);
        let mut alerts = vec![];

        // The same token presented over and over
        let repeats = gatepass
            .database
            .count_attempts_for_token(token, since)
            .await?;

        if repeats > repeat_threshold {
            alerts.push(
                Self::raise(
                    gatepass,
                    token,
                    ticket_id,
                    AlertCategory::SuspiciousActivity,
                    format!(
                        "token presented {} times in the last {} seconds",
                        repeats, window_secs
                    ),
                )
                .await?,
            );
        }

        // Stale tokens scanned against the same ticket
        if let (Some(ticket_id), Some(threshold)) = (ticket_id, polling_threshold) {
            let stale_scans = gatepass
                .database
                .count_ticket_attempts_with_outcome(ticket_id, VerifyOutcome::Expired, since)
                .await?;

            if stale_scans > threshold {
                alerts.push(
                    Self::raise(
                        gatepass,
                        token,
                        Some(ticket_id),
                        AlertCategory::TokenPolling,
                        format!(
                            "ticket scanned with stale tokens {} times in the last {} seconds",
                            stale_scans, window_secs
                        ),
                    )
                    .await?,
                );
            }
        }

        Ok(alerts)
    }

    /// Raise and persist a fraud alert
    async fn raise(
        gatepass: &Gatepass,
        token: &str,
        ticket_id: Option<&str>,
        category: AlertCategory,
        description: String,
    ) -> Result<FraudAlert> {
        let alert = FraudAlert {
            id: ulid::Ulid::new().to_string(),
            token: token.to_string(),
            ticket_id: ticket_id.map(|id| id.to_string()),
            category,
            description,
            raised_at: Timestamp::now_utc(),
        };

        alert.save(gatepass).await?;
        warn!("Raised a fraud alert: {}", alert.description);

        gatepass
            .publish_event(GatepassEvent::RaiseAlert {
                alert: alert.clone(),
            })
            .await;

        Ok(alert)
    }

    /// Save model
    pub async fn save(&self, gatepass: &Gatepass) -> Success {
        gatepass.database.save_alert(self).await
    }
}

#[cfg(test)]
mod tests {
    use crate::config::FraudDetection;
    use crate::models::{
        AlertCategory, Event, FraudAlert, ScannerContext, Ticket, VerificationAttempt,
        VerificationToken, VerifyOutcome,
    };
    use crate::{Config, Gatepass};
    use iso8601_timestamp::{Duration, Timestamp};

    fn scanner() -> ScannerContext {
        ScannerContext {
            scanner_id: "gate_1".to_string(),
            location: None,
            ip_address: None,
        }
    }

    #[async_std::test]
    async fn repeated_scans_of_one_token_raise_an_alert() {
        let gatepass = Gatepass::default();

        for _ in 0..3 {
            VerificationAttempt::verify(&gatepass, "garbage", scanner())
                .await
                .unwrap();
        }

        // Three scans sit at the threshold
        assert!(gatepass
            .database
            .find_alerts_since(None)
            .await
            .unwrap()
            .is_empty());

        VerificationAttempt::verify(&gatepass, "garbage", scanner())
            .await
            .unwrap();

        let alerts = gatepass.database.find_alerts_since(None).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::SuspiciousActivity);
        assert_eq!(alerts[0].token, "garbage");
    }

    #[async_std::test]
    async fn attempts_outside_the_window_are_forgotten() {
        let gatepass = Gatepass::default();

        // Old scans of the same token, beyond the 300 second window
        for _ in 0..3 {
            let attempt = VerificationAttempt {
                id: ulid::Ulid::new().to_string(),
                token: "garbage".to_string(),
                ticket_id: None,
                scanner: scanner(),
                outcome: VerifyOutcome::NotFound,
                attempted_at: Timestamp::now_utc() - Duration::seconds(400),
            };

            attempt.save(&gatepass).await.unwrap();
        }

        VerificationAttempt::verify(&gatepass, "garbage", scanner())
            .await
            .unwrap();

        assert!(gatepass
            .database
            .find_alerts_since(None)
            .await
            .unwrap()
            .is_empty());
    }

    #[async_std::test]
    async fn polling_with_stale_tokens_raises_an_alert() {
        let gatepass = Gatepass::default();

        let event = Event::new(
            &gatepass,
            "Proof of Concert".to_string(),
            "Hall C".to_string(),
            None,
        )
        .await
        .unwrap();

        let ticket = Ticket::new(&gatepass, event.id, "wallet_alice".to_string())
            .await
            .unwrap();

        // Scans of four tokens in a row, each gone stale before the gate
        for _ in 0..4 {
            let mut ticket = gatepass.database.find_ticket(&ticket.id).await.unwrap();
            let issued = ticket
                .issue_token(&gatepass, "wallet_alice", None)
                .await
                .unwrap();

            ticket.verification = Some(VerificationToken {
                token: issued.token.clone(),
                expiry: Timestamp::now_utc() - Duration::seconds(5),
            });
            ticket.save(&gatepass).await.unwrap();

            let verification = VerificationAttempt::verify(&gatepass, &issued.token, scanner())
                .await
                .unwrap();

            assert_eq!(verification.outcome, VerifyOutcome::Expired);
        }

        let alerts = gatepass.database.find_alerts_since(None).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::TokenPolling);
        assert_eq!(alerts[0].ticket_id.as_deref(), Some(ticket.id.as_str()));
    }

    #[async_std::test]
    async fn detection_can_be_switched_off() {
        let gatepass = Gatepass {
            config: Config {
                fraud_detection: FraudDetection::Disabled,
                ..Default::default()
            },
            ..Default::default()
        };

        for _ in 0..5 {
            VerificationAttempt::verify(&gatepass, "garbage", scanner())
                .await
                .unwrap();
        }

        assert!(gatepass
            .database
            .find_alerts_since(None)
            .await
            .unwrap()
            .is_empty());

        assert!(FraudAlert::evaluate_pattern(&gatepass, "garbage", None)
            .await
            .unwrap()
            .is_empty());
    }
}
