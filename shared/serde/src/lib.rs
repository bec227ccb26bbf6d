//! # KBE Serde
//! Append-only binary Bundle writer and its matching reader.
//!
//! Every value is written little-endian with no padding, so a payload is
//! decoded by reading fields back in exactly the order they were written.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bundle;
mod bundle_reader;
mod error;
mod serde;

pub use bundle::Bundle;
pub use bundle_reader::BundleReader;
pub use error::SerdeErr;
pub use serde::Serde;
