//! Core data types for the homework status bot.

pub mod error;
pub mod record;
pub mod status;

pub use error::*;
pub use record::*;
pub use status::*;
