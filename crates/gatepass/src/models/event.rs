use super::Coordinates;

/// Event model
///
/// The slice of the event record this engine needs: display details
/// for the gate and the venue position for proximity-based windows.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct Event {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Venue display name
    pub venue: String,

    /// Venue coordinates
    ///
    /// Tokens issued close to these coordinates get a wider window.
    pub venue_location: Option<Coordinates>,
}
