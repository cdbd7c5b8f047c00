pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod warehouse;
pub mod writers;

pub use error::{EtlError, Result};
