pub mod aggregator;
pub mod calendar_reader;

pub use aggregator::{FileAggregator, RawFrame};
pub use calendar_reader::read_calendar;
