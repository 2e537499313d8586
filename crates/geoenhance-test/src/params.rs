//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use geoenhance_core::{Band, GeoTransform, Raster};
use geoenhance_io::{GeoTiffOptions, read_geotiff, write_geotiff};
use std::path::PathBuf;
use tempfile::TempDir;

/// Regression test parameters
///
/// Tracks the state of a regression test: its name, the index of the
/// current check, the overall success status and a scratch directory for
/// rasters written during the test. The directory is removed on drop.
pub struct RegParams {
    /// Name of the test (e.g., "clahe")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
    /// Scratch directory for written rasters
    regout: TempDir,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Panics
    ///
    /// Panics if the scratch directory cannot be created.
    pub fn new(test_name: &str) -> Self {
        let regout = tempfile::Builder::new()
            .prefix(&format!("{}_reg", test_name))
            .tempdir()
            .expect("cannot create regression output directory");

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
            regout,
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Path for an output file inside the scratch directory
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.regout.path().join(name)
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Record a boolean check
    pub fn compare_flag(&mut self, expected: bool, actual: bool) -> bool {
        self.compare_values(expected as u8 as f64, actual as u8 as f64, 0.0)
    }

    /// Compare the six coefficients of two geotransforms
    pub fn compare_geotransform(
        &mut self,
        expected: &GeoTransform,
        actual: &GeoTransform,
        delta: f64,
    ) -> bool {
        self.index += 1;
        let mismatch = expected
            .to_gdal()
            .iter()
            .zip(actual.to_gdal())
            .position(|(e, a)| (e - a).abs() > delta);

        match mismatch {
            Some(coeff) => {
                let msg = format!(
                    "Failure in {}_reg: geotransform comparison for index {}\n\
                     coefficient {} differs: expected {}, actual {}",
                    self.test_name, self.index, coeff, expected, actual
                );
                self.fail(msg)
            }
            None => true,
        }
    }

    /// Compare two bands sample by sample
    ///
    /// NaN matches NaN.
    pub fn compare_bands(&mut self, expected: &Band, actual: &Band, delta: f64) -> bool {
        self.index += 1;

        if expected.dimensions() != actual.dimensions() {
            let msg = format!(
                "Failure in {}_reg: band comparison for index {} - dimension mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.dimensions(),
                actual.dimensions()
            );
            return self.fail(msg);
        }

        let width = expected.width() as usize;
        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(&e, &a)| !(e.is_nan() && a.is_nan()) && !((e - a).abs() <= delta));

        match mismatch {
            Some(i) => {
                let msg = format!(
                    "Failure in {}_reg: band comparison for index {} - sample mismatch at ({}, {}): {} vs {}",
                    self.test_name,
                    self.index,
                    i % width,
                    i / width,
                    expected.data()[i],
                    actual.data()[i]
                );
                self.fail(msg)
            }
            None => true,
        }
    }

    /// Write a raster to the scratch directory, read it back and compare
    ///
    /// Dimensions, sample type, geotransform, projection, no-data and every
    /// band are checked. Returns the written path.
    pub fn write_raster_and_check(
        &mut self,
        raster: &Raster,
        options: &GeoTiffOptions,
    ) -> TestResult<PathBuf> {
        let path = self.output_path(&format!("{}.{:02}.tif", self.test_name, self.index + 1));

        write_geotiff(&path, raster, options).map_err(|e| TestError::RasterWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let back = read_geotiff(&path).map_err(|e| TestError::RasterRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        self.compare_values(raster.width() as f64, back.width() as f64, 0.0);
        self.compare_values(raster.height() as f64, back.height() as f64, 0.0);
        self.compare_values(raster.band_count() as f64, back.band_count() as f64, 0.0);
        self.compare_flag(true, raster.sample_type() == back.sample_type());
        self.compare_geotransform(raster.geo_transform(), back.geo_transform(), 1e-9);
        self.compare_flag(true, raster.projection() == back.projection());
        self.compare_flag(true, raster.nodata() == back.nodata());
        for (expected, actual) in raster.bands().iter().zip(back.bands()) {
            let quantized = expected.map(|v| raster.sample_type().quantize(v));
            self.compare_bands(&quantized, actual, 0.0);
        }

        Ok(path)
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
