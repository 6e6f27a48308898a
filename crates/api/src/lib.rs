//! Client for the homework status API.
//!
//! - `rest` - the `StatusApi` seam and its reqwest implementation
//! - `response` - validation of the response envelope
//! - `error` - `ApiError` with its `ErrorKind` classification

pub mod error;
pub mod response;
pub mod rest;

pub use error::*;
pub use response::*;
pub use rest::*;
