pub mod config;
pub mod error;
pub mod input;
pub mod pedigree;
pub mod reports;
pub mod types;

pub use error::{Result, SuccessionError};
