pub mod gesture;
pub mod range;
pub mod scale;

pub use gesture::PinchTracker;
pub use range::{filter_range, Range, RANGES};
