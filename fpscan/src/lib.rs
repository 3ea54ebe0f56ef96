#![warn(clippy::all)]
//! Capture, enroll and identify fingerprints against a reader SDK.
//!
//! The flows in [`capture`], [`enroll`] and [`identify`] only talk to the
//! [`reader::Reader`] trait. Readers come from libfprint (feature `libfprint`)
//! or from the [`simulated`] backend.

pub mod capture;
pub mod cli;
pub mod config;
pub mod enroll;
mod errors;
pub mod identify;
#[cfg(feature = "libfprint")]
pub mod libfprint;
pub mod png;
pub mod reader;
pub mod retry;
pub mod session;
pub mod simulated;
pub mod store;
pub mod template;

pub use crate::errors::*;

pub type Result<T> = std::result::Result<T, ScanError>;
