//! Contrast, super-resolution and batch pipelines

pub mod batch;
pub mod config;
pub mod contrast;
pub mod superres;

pub use batch::{BatchEvent, BatchReport, collect_inputs, output_path_for, run_batch};
pub use config::{BatchConfig, ContrastConfig, SuperResConfig};
pub use contrast::{band_to_gray8, enhance_raster, run_contrast, run_contrast_with};
pub use superres::{is_supported_band_count, run_superres, super_resolve};
