pub mod calendar;
pub mod dimensions;
pub mod observation;

pub use calendar::CalendarDay;
pub use dimensions::{DateRecord, StationRecord, WeatherFact};
pub use observation::CleanObservation;
