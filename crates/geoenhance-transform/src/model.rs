//! Super-resolution model names
//!
//! Pre-trained models are distributed as `<ALGORITHM>_x<SCALE>.<ext>`,
//! e.g. `EDSR_x4.pb` or `EDSR_x4.onnx`.

use crate::{TransformError, TransformResult};
use std::fmt;
use std::path::Path;

/// Algorithm and scale encoded in a model file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Lower-case algorithm name (`edsr`, `espcn`, ...)
    pub algorithm: String,
    /// Integer upscaling factor
    pub scale: u32,
}

impl ModelSpec {
    pub fn new(algorithm: &str, scale: u32) -> TransformResult<Self> {
        if algorithm.is_empty() {
            return Err(TransformError::InvalidParameters(
                "model algorithm name is empty".into(),
            ));
        }
        if scale < 2 {
            return Err(TransformError::InvalidScaleFactor(format!(
                "model scale must be >= 2, got {}",
                scale
            )));
        }
        Ok(Self {
            algorithm: algorithm.to_ascii_lowercase(),
            scale,
        })
    }

    /// Parse a model name such as `EDSR_x4`.
    ///
    /// A trailing extension is ignored.
    pub fn parse(name: &str) -> TransformResult<Self> {
        let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        let (algorithm, scale) = stem
            .rsplit_once("_x")
            .or_else(|| stem.rsplit_once("_X"))
            .ok_or_else(|| {
                TransformError::InvalidParameters(format!(
                    "model name '{}' is not of the form <algorithm>_x<scale>",
                    name
                ))
            })?;
        let scale = scale.parse::<u32>().map_err(|_| {
            TransformError::InvalidScaleFactor(format!(
                "model name '{}' has no integer scale",
                name
            ))
        })?;
        Self::new(algorithm, scale)
    }

    /// Parse the file name of a model path
    pub fn from_path(path: &Path) -> TransformResult<Self> {
        let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            TransformError::InvalidParameters(format!(
                "model path '{}' has no file name",
                path.display()
            ))
        })?;
        Self::parse(name)
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_x{}", self.algorithm, self.scale)
    }
}
