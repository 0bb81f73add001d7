//! Cinder Shared - common code for the cinder volume drivers
//!
//! This crate contains the error types and constants shared by the
//! driver library (cinder-rbd) and its command-line front end.

pub mod constants;
pub mod errors;

pub use errors::{CinderError, CinderResult, CommandError, DecodeError};
