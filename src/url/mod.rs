//! URL handling module for Pichound
//!
//! Provides URL normalization, host extraction, the same-host check, and
//! the include/exclude link filter.

mod domain;
mod filters;
mod normalize;

pub use domain::{extract_host, same_host};
pub use filters::LinkFilter;
pub use normalize::normalize_url;
