use bistro_core::{InsightsError, InsightsResult};
use ndarray::Array1;

/// Cosine similarity between two embedding vectors, in `[-1, 1]`.
///
/// Mismatched or empty dimensions are an error. A zero-magnitude vector has
/// no direction and scores 0.0 so that rankings stay totally ordered.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> InsightsResult<f64> {
    if a.is_empty() || b.is_empty() {
        return Err(InsightsError::EmptyVector);
    }
    if a.len() != b.len() {
        return Err(InsightsError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    let a: Array1<f64> = a.iter().map(|&x| f64::from(x)).collect();
    let b: Array1<f64> = b.iter().map(|&x| f64::from(x)).collect();

    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if !(dot.is_finite() && norm_a.is_finite() && norm_b.is_finite()) {
        return Err(InsightsError::validation(
            "embedding contains non-finite values",
        ));
    }
    if norm_a < 1e-12 || norm_b < 1e-12 {
        return Ok(0.0);
    }

    // Rounding can push the ratio slightly past the valid range.
    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}
