#[cfg(feature = "rocket-impl")]
pub mod okapi;

#[cfg(feature = "rocket-impl")]
pub mod rocket;
