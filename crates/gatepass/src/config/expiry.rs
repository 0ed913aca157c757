/// One step of the distance-to-window mapping
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExpiryTier {
    /// Upper bound on the distance to the venue, in metres (inclusive)
    pub within_metres: f64,

    /// Token lifetime granted inside this radius, in seconds
    pub window_secs: u64,
}

/// Location-aware widening of the token window
#[derive(Serialize, Deserialize, Clone)]
pub enum ProximityExpiry {
    /// Every token gets the default window
    Disabled,

    /// Widen the window as the holder approaches the venue
    Enabled { tiers: Vec<ExpiryTier> },
}

/// Token lifetime options
#[derive(Serialize, Deserialize, Clone)]
pub struct TokenExpiry {
    /// Window applied when the distance to the venue is unknown or
    /// beyond every tier, in seconds
    pub default_window_secs: u64,

    /// Distance-based widening
    pub proximity: ProximityExpiry,
}

impl Default for TokenExpiry {
    fn default() -> TokenExpiry {
        TokenExpiry {
            default_window_secs: 30,
            proximity: ProximityExpiry::Enabled {
                tiers: vec![
                    ExpiryTier {
                        within_metres: 100.0,
                        window_secs: 5 * 60,
                    },
                    ExpiryTier {
                        within_metres: 1000.0,
                        window_secs: 2 * 60,
                    },
                ],
            },
        }
    }
}

impl TokenExpiry {
    /// Resolve the window for a holder at the given distance
    ///
    /// A tier can only widen the window, so the result never shrinks
    /// as the holder moves closer to the venue, whatever order the
    /// tiers are configured in.
    pub fn window_secs(&self, distance_metres: Option<f64>) -> u64 {
        let mut window = self.default_window_secs;

        if let (ProximityExpiry::Enabled { tiers }, Some(distance)) =
            (&self.proximity, distance_metres)
        {
            for tier in tiers {
                if distance <= tier.within_metres && tier.window_secs > window {
                    window = tier.window_secs;
                }
            }
        }

        window
    }
}
