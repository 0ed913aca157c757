mod alert;
mod attempt;
mod event;
mod location;
mod ticket;

pub use alert::*;
pub use attempt::*;
pub use event::*;
pub use location::*;
pub use ticket::*;
