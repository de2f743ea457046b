//! Shared types for Vox crates

mod error;

pub use error::HttpError;
