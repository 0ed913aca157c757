/// Geographic coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
