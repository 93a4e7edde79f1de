//! Core constants and error types shared by every codec layer.

pub mod constants;
mod error;

pub use error::{BuildError, CursorError, DecodeError, JulianDateError};
