//! Fetch fraud alerts for operator review
//! GET /alerts?since=
use gatepass::models::FraudAlert;
use gatepass::{Error, Gatepass, Result};
use iso8601_timestamp::Timestamp;
use rocket::serde::json::Json;
use rocket::State;

/// # Fetch Alerts
///
/// Fetch fraud alerts, oldest first. With `since`, only alerts raised
/// at or after that instant are returned.
#[openapi(tag = "Alerts")]
#[get("/?<since>")]
pub async fn fetch(
    gatepass: &State<Gatepass>,
    since: Option<String>,
) -> Result<Json<Vec<FraudAlert>>> {
    let since = match since {
        Some(raw) => {
            Some(Timestamp::parse(&raw).ok_or(Error::IncorrectData { with: "since" })?)
        }
        None => None,
    };

    gatepass.database.find_alerts_since(since).await.map(Json)
}

#[cfg(test)]
mod tests {
    use crate::test::*;
    use iso8601_timestamp::{Duration, Timestamp};

    async fn alert_raised_at(gatepass: &Gatepass, raised_at: Timestamp) -> FraudAlert {
        let alert = FraudAlert {
            id: ulid::Ulid::new().to_string(),
            token: "garbage".to_string(),
            ticket_id: None,
            category: AlertCategory::SuspiciousActivity,
            description: "token presented 4 times in the last 300 seconds".to_string(),
            raised_at,
        };

        alert.save(gatepass).await.unwrap();
        alert
    }

    #[async_std::test]
    async fn success_empty() {
        let (client, _) = bootstrap_rocket(routes![crate::routes::alerts::fetch::fetch]).await;

        let res = client.get("/").dispatch().await;

        assert_eq!(res.status(), Status::Ok);
        assert_eq!(res.into_string().await, Some("[]".into()));
    }

    #[async_std::test]
    async fn success_lists_alerts_oldest_first() {
        let (gatepass, _) = for_test().await;

        let first = alert_raised_at(&gatepass, Timestamp::now_utc()).await;

        // Ids carry the ordering, so spacing the clock keeps it stable
        async_std::task::sleep(std::time::Duration::from_millis(5)).await;

        let second = alert_raised_at(&gatepass, Timestamp::now_utc()).await;

        let client = bootstrap_rocket_with_gatepass(
            gatepass,
            routes![crate::routes::alerts::fetch::fetch],
        )
        .await;

        let res = client.get("/").dispatch().await;

        assert_eq!(res.status(), Status::Ok);

        let alerts: Vec<FraudAlert> =
            serde_json::from_str(&res.into_string().await.unwrap()).unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].id, first.id);
        assert_eq!(alerts[1].id, second.id);
    }

    #[async_std::test]
    async fn success_since_hides_older_alerts() {
        let (gatepass, _) = for_test().await;

        alert_raised_at(&gatepass, Timestamp::now_utc() - Duration::seconds(600)).await;
        let recent = alert_raised_at(&gatepass, Timestamp::now_utc()).await;

        let client = bootstrap_rocket_with_gatepass(
            gatepass,
            routes![crate::routes::alerts::fetch::fetch],
        )
        .await;

        let since = (Timestamp::now_utc() - Duration::seconds(60))
            .format()
            .to_string();

        let res = client.get(format!("/?since={}", since)).dispatch().await;

        assert_eq!(res.status(), Status::Ok);

        let alerts: Vec<FraudAlert> =
            serde_json::from_str(&res.into_string().await.unwrap()).unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, recent.id);
    }

    #[async_std::test]
    async fn fail_unparseable_since() {
        let (client, _) = bootstrap_rocket(routes![crate::routes::alerts::fetch::fetch]).await;

        let res = client.get("/?since=yesterday").dispatch().await;

        assert_eq!(res.status(), Status::BadRequest);
        assert_eq!(
            res.into_string().await,
            Some("{\"type\":\"IncorrectData\",\"with\":\"since\"}".into())
        );
    }
}
