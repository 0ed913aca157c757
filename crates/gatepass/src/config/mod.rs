mod expiry;
mod fraud;
mod ip_resolve;

pub use expiry::*;
pub use fraud::*;
pub use ip_resolve::*;

/// Gatepass configuration
#[derive(Default, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Verification token lifetimes
    pub token_expiry: TokenExpiry,

    /// Scan-pattern monitoring
    pub fraud_detection: FraudDetection,

    /// Whether this application is running behind Cloudflare
    pub resolve_ip: ResolveIp,
}
