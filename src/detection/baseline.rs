//! Baseline curve fitting for manual integration.
//!
//! The manual path fits a smooth curve through the samples classified as
//! baseline and evaluates it at every timestamp of the trace. The fit is a
//! pluggable [`BaselineFitStrategy`]; [`PolynomialBaseline`] is the default.

use nalgebra::{DMatrix, DVector};

use super::DetectionError;

/// Degree of the default baseline polynomial
pub const DEFAULT_BASELINE_DEGREE: usize = 5;

/// A way of turning baseline samples into a baseline value per timestamp
pub trait BaselineFitStrategy: Send + Sync {
    /// Short name for logs and processing metadata
    fn name(&self) -> &str;

    /// Fit `values` observed at `times` and evaluate the curve at `eval_times`.
    fn fit(
        &self,
        times: &[f64],
        values: &[f64],
        eval_times: &[f64],
    ) -> Result<Vec<f64>, DetectionError>;
}

/// Least-squares polynomial of intensity against time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialBaseline {
    degree: usize,
}

impl Default for PolynomialBaseline {
    fn default() -> Self {
        Self {
            degree: DEFAULT_BASELINE_DEGREE,
        }
    }
}

impl PolynomialBaseline {
    /// Polynomial of the given degree
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }

    /// Polynomial degree
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Coefficients, highest power first.
    ///
    /// Columns of the Vandermonde matrix are scaled to unit norm before the
    /// SVD solve; singular values below `len * EPSILON` relative to the largest
    /// are discarded, which yields the minimum-norm solution when there are
    /// fewer points than coefficients.
    pub fn coefficients(&self, times: &[f64], values: &[f64]) -> Result<Vec<f64>, DetectionError> {
        if times.len() != values.len() {
            return Err(DetectionError::BaselineFit(format!(
                "{} times but {} values",
                times.len(),
                values.len()
            )));
        }
        if times.is_empty() {
            return Err(DetectionError::BaselineFit(
                "no baseline points to fit".to_string(),
            ));
        }

        let cols = self.degree + 1;
        let power = |c: usize| (self.degree - c) as i32;

        let mut scales = vec![0.0f64; cols];
        for &t in times {
            for (c, scale) in scales.iter_mut().enumerate() {
                *scale += t.powi(power(c)).powi(2);
            }
        }
        for scale in &mut scales {
            *scale = scale.sqrt();
            if *scale == 0.0 {
                *scale = 1.0;
            }
        }

        let a = DMatrix::from_fn(times.len(), cols, |r, c| times[r].powi(power(c)) / scales[c]);
        let b = DVector::from_column_slice(values);

        let svd = a.svd(true, true);
        let eps = times.len() as f64 * f64::EPSILON * svd.singular_values.max();
        let solution = svd
            .solve(&b, eps)
            .map_err(|e| DetectionError::BaselineFit(e.to_string()))?;

        let coefficients: Vec<f64> = solution.iter().zip(&scales).map(|(c, s)| c / s).collect();
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(DetectionError::BaselineFit(
                "fit produced non-finite coefficients".to_string(),
            ));
        }
        Ok(coefficients)
    }
}

/// Evaluate a polynomial (highest power first) with Horner's scheme
pub fn evaluate_polynomial(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

impl BaselineFitStrategy for PolynomialBaseline {
    fn name(&self) -> &str {
        "polynomial"
    }

    fn fit(
        &self,
        times: &[f64],
        values: &[f64],
        eval_times: &[f64],
    ) -> Result<Vec<f64>, DetectionError> {
        let coefficients = self.coefficients(times, values)?;
        Ok(eval_times
            .iter()
            .map(|&t| evaluate_polynomial(&coefficients, t))
            .collect())
    }
}
