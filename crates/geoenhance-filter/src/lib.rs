//! geoenhance-filter - Contrast enhancement for 8-bit bands
//!
//! - [`clahe`]: contrast-limited adaptive histogram equalization
//! - [`equalize`]: global histogram equalization through a tone curve
//! - [`BandEnhancer`]: common interface used by the contrast pipeline

pub mod clahe;
pub mod enhance;
pub mod enhancer;
mod error;

pub use clahe::{ClaheParams, clahe};
pub use enhance::{TrcLut, equalize, equalize_trc, trc_map};
pub use enhancer::{BandEnhancer, Clahe, Equalize};
pub use error::{FilterError, FilterResult};
