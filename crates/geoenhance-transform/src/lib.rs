//! geoenhance-transform - Super-resolution upsampling for geoenhance
//!
//! This crate provides:
//!
//! - The [`Upsampler`] trait and an interpolating implementation
//! - An ONNX Runtime upsampler for pre-trained networks (feature `onnx`)
//! - Band to channel stacking and splitting
//! - Model file name parsing (`EDSR_x4` → algorithm `edsr`, scale 4)

pub mod channels;
mod error;
pub mod model;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod upsample;

pub use channels::{ChannelMerge, from_planar, split_channels, stack_channels, to_planar};
pub use error::{TransformError, TransformResult};
pub use model::ModelSpec;
#[cfg(feature = "onnx")]
pub use onnx::OnnxUpsampler;
pub use upsample::{InterpolatingUpsampler, ScaleFilter, Upsampler};
