/// Fraud pattern detection options
#[derive(Serialize, Deserialize, Clone)]
pub enum FraudDetection {
    /// Do not inspect failed verification attempts
    Disabled,

    /// Raise alerts when failed attempts cluster
    Enabled {
        /// How far back to look for related attempts, in seconds
        window_secs: u64,

        /// Attempts on the same token above this count raise an alert
        repeat_threshold: u64,

        /// Expired scans of the same ticket above this count raise an
        /// alert, if set
        polling_threshold: Option<u64>,
    },
}

impl Default for FraudDetection {
    fn default() -> FraudDetection {
        FraudDetection::Enabled {
            window_secs: 5 * 60,
            repeat_threshold: 3,
            polling_threshold: Some(3),
        }
    }
}
