//! Network-backed upsampling through ONNX Runtime
//!
//! The model takes a `1 x 3 x H x W` float tensor on the [0, 255] scale and
//! returns `1 x 3 x (H*s) x (W*s)` on the same scale, which is how EDSR
//! exports behave.

use crate::channels::{from_planar, to_planar};
use crate::model::ModelSpec;
use crate::upsample::Upsampler;
use crate::{TransformError, TransformResult};
use image::{Rgb32FImage, RgbImage};
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use tracing::debug;

fn model_err(e: ort::Error) -> TransformError {
    TransformError::Model(e.to_string())
}

/// Upsampler running a pre-trained super-resolution network
pub struct OnnxUpsampler {
    session: Session,
    spec: ModelSpec,
    name: String,
    input_name: String,
    output_name: String,
}

impl OnnxUpsampler {
    /// Load a model, reading the scale from its file name (`EDSR_x4.onnx`)
    pub fn from_file(path: impl AsRef<Path>) -> TransformResult<Self> {
        let spec = ModelSpec::from_path(path.as_ref())?;
        Self::with_spec(path, spec)
    }

    /// Load a model with an explicit algorithm and scale
    pub fn with_spec(path: impl AsRef<Path>, spec: ModelSpec) -> TransformResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TransformError::Model(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(model_err)?
            .commit_from_file(path)
            .map_err(model_err)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| TransformError::Model("model has no inputs".into()))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| TransformError::Model("model has no outputs".into()))?;

        debug!(
            "Loaded {} from {} (input '{}', output '{}')",
            spec,
            path.display(),
            input_name,
            output_name
        );

        Ok(Self {
            session,
            name: spec.to_string(),
            spec,
            input_name,
            output_name,
        })
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }
}

impl Upsampler for OnnxUpsampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn scale(&self) -> u32 {
        self.spec.scale
    }

    fn upsample(&mut self, input: &RgbImage) -> TransformResult<Rgb32FImage> {
        let (width, height) = input.dimensions();
        let (w, h) = (width as usize, height as usize);

        let tensor = Tensor::from_array(([1usize, 3, h, w], to_planar(input))).map_err(model_err)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(model_err)?;
        let (shape, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(model_err)?;
        let dims: Vec<i64> = shape.iter().copied().collect();

        let scale = self.spec.scale as i64;
        let expected = [1, 3, h as i64 * scale, w as i64 * scale];
        if dims.as_slice() != expected {
            return Err(TransformError::Model(format!(
                "unexpected output shape {:?}, expected {:?}",
                dims, expected
            )));
        }

        from_planar(data, width * self.spec.scale, height * self.spec.scale)
    }
}
