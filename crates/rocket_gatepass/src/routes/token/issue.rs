//! Issue a verification token for a ticket
//! POST /token/issue
use gatepass::models::{Coordinates, IssuedToken};
use gatepass::{Gatepass, Result};
use rocket::serde::json::Json;
use rocket::State;

/// # Issue Data
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DataIssueToken {
    /// Ticket to issue a token for
    pub ticket_id: String,
    /// Wallet identity requesting the token
    pub owner_id: String,
    /// Holder's reported coordinates
    pub location: Option<Coordinates>,
}

/// # Issue Token
///
/// Issue a short-lived verification token for a ticket, to be rendered
/// as a QR code.
///
/// While a live token exists it is returned unchanged. Holders close
/// to the venue are granted a wider window.
#[openapi(tag = "Token")]
#[post("/issue", data = "<data>")]
pub async fn issue(
    gatepass: &State<Gatepass>,
    data: Json<DataIssueToken>,
) -> Result<Json<IssuedToken>> {
    let data = data.into_inner();

    let mut ticket = gatepass.database.find_ticket(&data.ticket_id).await?;

    ticket
        .issue_token(gatepass, &data.owner_id, data.location)
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use crate::test::*;

    #[async_std::test]
    async fn success() {
        let (gatepass, ticket, _) = for_test_with_ticket().await;

        let client = bootstrap_rocket_with_gatepass(
            gatepass,
            routes![crate::routes::token::issue::issue],
        )
        .await;

        let res = client
            .post("/issue")
            .header(ContentType::JSON)
            .body(
                json!({
                    "ticket_id": ticket.id,
                    "owner_id": "wallet_alice"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);

        let issued: IssuedToken =
            serde_json::from_str(&res.into_string().await.unwrap()).unwrap();

        assert_eq!(issued.token.len(), 64);
        assert_eq!(issued.seconds_remaining, 30);
    }

    #[async_std::test]
    async fn success_repeat_request_returns_same_token() {
        let (gatepass, ticket, _) = for_test_with_ticket().await;

        let client = bootstrap_rocket_with_gatepass(
            gatepass,
            routes![crate::routes::token::issue::issue],
        )
        .await;

        let mut tokens = vec![];
        for _ in 0..2 {
            let res = client
                .post("/issue")
                .header(ContentType::JSON)
                .body(
                    json!({
                        "ticket_id": ticket.id,
                        "owner_id": "wallet_alice"
                    })
                    .to_string(),
                )
                .dispatch()
                .await;

            assert_eq!(res.status(), Status::Ok);

            let issued: IssuedToken =
                serde_json::from_str(&res.into_string().await.unwrap()).unwrap();

            tokens.push(issued.token);
        }

        assert_eq!(tokens[0], tokens[1]);
    }

    #[async_std::test]
    async fn success_wider_window_near_the_venue() {
        let (gatepass, ticket, _) = for_test_with_ticket().await;

        let client = bootstrap_rocket_with_gatepass(
            gatepass,
            routes![crate::routes::token::issue::issue],
        )
        .await;

        let res = client
            .post("/issue")
            .header(ContentType::JSON)
            .body(
                json!({
                    "ticket_id": ticket.id,
                    "owner_id": "wallet_alice",
                    "location": {
                        "latitude": 51.5007,
                        "longitude": -0.1246
                    }
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);

        let issued: IssuedToken =
            serde_json::from_str(&res.into_string().await.unwrap()).unwrap();

        assert_eq!(issued.seconds_remaining, 300);
    }

    #[async_std::test]
    async fn fail_not_the_owner() {
        let (gatepass, ticket, _) = for_test_with_ticket().await;

        let client = bootstrap_rocket_with_gatepass(
            gatepass,
            routes![crate::routes::token::issue::issue],
        )
        .await;

        let res = client
            .post("/issue")
            .header(ContentType::JSON)
            .body(
                json!({
                    "ticket_id": ticket.id,
                    "owner_id": "wallet_mallory"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Unauthorized);
        assert_eq!(
            res.into_string().await,
            Some("{\"type\":\"Unauthorized\"}".into())
        );
    }

    #[async_std::test]
    async fn fail_ticket_already_redeemed() {
        let (gatepass, mut ticket, _) = for_test_with_ticket().await;

        let issued = ticket
            .issue_token(&gatepass, "wallet_alice", None)
            .await
            .unwrap();

        assert!(gatepass
            .database
            .consume_ticket_token(&ticket.id, &issued.token)
            .await
            .unwrap());

        let client = bootstrap_rocket_with_gatepass(
            gatepass,
            routes![crate::routes::token::issue::issue],
        )
        .await;

        let res = client
            .post("/issue")
            .header(ContentType::JSON)
            .body(
                json!({
                    "ticket_id": ticket.id,
                    "owner_id": "wallet_alice"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Conflict);
        assert_eq!(
            res.into_string().await,
            Some("{\"type\":\"AlreadyUsed\"}".into())
        );
    }

    #[async_std::test]
    async fn fail_unknown_ticket() {
        let (client, _) = bootstrap_rocket(routes![crate::routes::token::issue::issue]).await;

        let res = client
            .post("/issue")
            .header(ContentType::JSON)
            .body(
                json!({
                    "ticket_id": "01H00000000000000000000000",
                    "owner_id": "wallet_alice"
                })
                .to_string(),
            )
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::NotFound);
        assert_eq!(
            res.into_string().await,
            Some("{\"type\":\"UnknownTicket\"}".into())
        );
    }
}
