//! Core types for gigbook.
//!
//! - [`Error`] / [`Result`]: typed, recoverable errors
//! - [`Failure`]: classification of failed remote calls
//! - [`AsyncResource`]: data / loading / error lifecycle of one remote value

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod failure;
pub mod resource;
pub mod result;

pub use error::Error;
pub use failure::{Failure, UNKNOWN_ERROR, describe_failure};
pub use resource::{AsyncResource, ResourceState};
pub use result::{Result, ResultExt};
