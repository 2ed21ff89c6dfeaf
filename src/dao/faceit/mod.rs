//! Read-only client for the FACEIT Data API (v4).

mod client;
mod error;
pub mod models;

pub use client::{DEFAULT_FACEIT_BASE_URL, FaceitClient, FaceitConfig};
pub use error::{FaceitError, FaceitResult};
