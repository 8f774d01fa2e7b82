//! Error types for batcha
//!
//! Every fallible operation in the core returns [`BatchaResult`]. The CLI maps
//! [`BatchaError::DifferencesFound`] to a silent non-zero exit and prints every
//! other variant.

mod constructors;
mod conversions;
mod types;

pub use types::{BatchaError, BatchaResult, OptionExt, ResultExt};
