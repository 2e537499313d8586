//! geoenhance-test - Regression test framework for geoenhance
//!
//! Integration tests under `crates/*/tests/*_reg.rs` follow one pattern:
//! build synthetic inputs with [`fixtures`], run the operation, record each
//! check on a [`RegParams`] and assert on [`RegParams::cleanup`].
//!
//! # Usage
//!
//! ```ignore
//! use geoenhance_test::RegParams;
//!
//! let mut rp = RegParams::new("superres");
//! rp.compare_values(400.0, output.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::RegParams;
