//! Shared error types

mod errors;

pub use errors::{HandsOnError, Result};
