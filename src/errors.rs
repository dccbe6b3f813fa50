//! Crate-wide error type.
//!
//! Everything fallible returns `Result<T>`. Typed failures of the video layer
//! live in `video::errors::Error` and can be recovered with
//! `failure::Error::downcast_ref`.

pub use failure::{Error, ResultExt};

pub type Result<T> = ::std::result::Result<T, Error>;
