pub mod booking;
pub mod event;

pub use booking::BookingStore;
pub use event::EventStore;
