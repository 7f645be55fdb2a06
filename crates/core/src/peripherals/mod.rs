pub mod led;
pub mod micros;

pub use led::{Led, LedEvent};
pub use micros::{MicrosCounter, SimClock};
