// Service exports
pub mod ride_index;

pub use ride_index::{IndexError, RideIndex};
