use iso8601_timestamp::Timestamp;
use sha2::{Digest, Sha256};

use crate::models::Coordinates;

const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Derive an opaque verification token
///
/// The token binds the ticket to the moment of issue plus a fresh
/// nonce, so it cannot be replayed onto another ticket or rebuilt
/// from ticket data alone.
pub fn derive_token(ticket_id: &str, issued_at: Timestamp, nonce: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ticket_id.as_bytes());
    hasher.update(issued_at.to_unix_timestamp_ms().to_le_bytes());
    hasher.update(nonce.as_bytes());

    hex::encode(hasher.finalize())
}

/// Whole seconds left until the given expiry, clamped at zero
pub fn seconds_remaining(expiry: Timestamp, now: Timestamp) -> u64 {
    let remaining_ms = expiry.to_unix_timestamp_ms() - now.to_unix_timestamp_ms();
    (remaining_ms.max(0) / 1000) as u64
}

/// Great-circle distance between two points, in metres
pub fn great_circle_metres(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METRES * h.sqrt().asin()
}
