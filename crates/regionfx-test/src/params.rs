//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use regionfx_core::RgbaBuffer;
use std::fs::{self, File};
use std::io::BufWriter;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare values and buffers only (default)
    #[default]
    Compare,
    /// Also write PNG snapshots for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running check index, the mode and every
/// recorded failure. Checks never panic; call [`RegParams::cleanup`] at
/// the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "equalize")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg);
            false
        } else {
            true
        }
    }

    /// Compare two pixel buffers for exact equality
    ///
    /// Reports the first differing pixel on failure.
    pub fn compare_buffers(&mut self, expected: &RgbaBuffer, actual: &RgbaBuffer) -> bool {
        self.index += 1;

        if expected.bounds() != actual.bounds() {
            let msg = format!(
                "Failure in {}_reg: buffer comparison for index {} - dimension mismatch",
                self.test_name, self.index
            );
            self.fail(msg);
            return false;
        }

        let first_diff = expected
            .data()
            .chunks_exact(4)
            .zip(actual.data().chunks_exact(4))
            .position(|(a, b)| a != b);

        if let Some(i) = first_diff {
            let (x, y) = expected.bounds().coords(i);
            let msg = format!(
                "Failure in {}_reg: buffer comparison for index {} - pixel mismatch at ({}, {}): {:?} vs {:?}",
                self.test_name,
                self.index,
                x,
                y,
                expected.pixel(i),
                actual.pixel(i)
            );
            self.fail(msg);
            return false;
        }

        true
    }

    /// Write a buffer as an RGBA PNG snapshot in display mode
    ///
    /// In compare mode this only advances the index.
    pub fn write_png(&mut self, buffer: &RgbaBuffer) -> TestResult<()> {
        self.index += 1;
        if !self.display() {
            return Ok(());
        }

        fs::create_dir_all(regout_dir())?;
        let path = format!("{}/{}.{:02}.png", regout_dir(), self.test_name, self.index);
        let file = File::create(&path)?;

        let mut encoder = png::Encoder::new(BufWriter::new(file), buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(|e| TestError::ImageWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        writer
            .write_image_data(buffer.data())
            .map_err(|e| TestError::ImageWrite {
                path: path.clone(),
                message: e.to_string(),
            })?;
        writer.finish().map_err(|e| TestError::ImageWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;

        eprintln!("Wrote: {}", path);
        Ok(())
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
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
