#[derive(Serialize, Deserialize, Clone)]
pub enum ResolveIp {
    /// Trust the remote address of the scanner connection
    Remote,

    /// Read the connecting IP from Cloudflare headers
    Cloudflare,
}

impl Default for ResolveIp {
    fn default() -> ResolveIp {
        ResolveIp::Remote
    }
}
