pub mod config;
pub mod error;
pub mod server;
pub mod triage;

pub use error::{Error, Result};
