use crate::{
    models::{Coordinates, Event},
    Gatepass, Result, Success,
};

impl Event {
    /// Create a new event
    pub async fn new(
        gatepass: &Gatepass,
        name: String,
        venue: String,
        venue_location: Option<Coordinates>,
    ) -> Result<Event> {
        let event = Event {
            id: ulid::Ulid::new().to_string(),
            name,
            venue,
            venue_location,
        };

        event.save(gatepass).await?;
        Ok(event)
    }

    /// Save model
    pub async fn save(&self, gatepass: &Gatepass) -> Success {
        gatepass.database.save_event(self).await
    }
}
