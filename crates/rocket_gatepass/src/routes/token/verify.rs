//! Verify a scanned token at the gate
//! POST /token/verify
use gatepass::models::{Coordinates, ScannerContext, Verification, VerificationAttempt};
use gatepass::{Gatepass, Result};
use rocket::serde::json::Json;
use rocket::State;

/// # Verify Data
#[derive(Serialize, Deserialize, JsonSchema)]
pub struct DataVerifyToken {
    /// Token exactly as scanned
    pub token: String,
    /// Scanner's reported coordinates
    pub location: Option<Coordinates>,
}

/// # Verify Token
///
/// Classify a scanned token and redeem the ticket it belongs to when
/// it is live. Every call is recorded, and failed scans feed fraud
/// pattern detection.
#[openapi(tag = "Token")]
#[post("/verify", data = "<data>")]
pub async fn verify(
    gatepass: &State<Gatepass>,
    mut scanner: ScannerContext,
    data: Json<DataVerifyToken>,
) -> Result<Json<Verification>> {
    let data = data.into_inner();
    scanner.location = data.location;

    VerificationAttempt::verify(gatepass, &data.token, scanner)
        .await
        .map(Json)
}
