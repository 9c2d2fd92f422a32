pub mod booking;
pub mod event;
