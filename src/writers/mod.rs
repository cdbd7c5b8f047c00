pub mod csv_writer;

pub use csv_writer::{read_cleaned, write_cleaned};
