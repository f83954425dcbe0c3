//! Small helpers exposed on the command line.

pub mod bytes;

pub use bytes::{bytes32, random_bytes32};
