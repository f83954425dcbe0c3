//! Error and result types shared by the harness operations.

pub mod error;

pub use error::{Error, Result};
