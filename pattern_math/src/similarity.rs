//! Cosine similarity between normalized windows

use crate::normalize::NormalizedWindow;
use crate::{MathError, Result};

/// Cosine similarity `dot(a, b) / (|a| * |b|)`, clamped to [-1, 1].
///
/// The slices must have equal length and non-zero norm. Rounding can push
/// the raw quotient a hair past 1.0 for identical inputs, hence the clamp.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(MathError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compare empty vectors".to_string(),
        ));
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(MathError::ZeroVector);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !similarity.is_finite() {
        return Err(MathError::CalculationError(format!(
            "Similarity is not finite: {}",
            similarity
        )));
    }

    Ok(similarity.clamp(-1.0, 1.0))
}

/// Score two normalized windows against each other
pub fn score(a: &NormalizedWindow, b: &NormalizedWindow) -> Result<f64> {
    cosine_similarity(a.values(), b.values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use approx::assert_relative_eq;

    #[test]
    fn test_self_similarity_is_one() {
        let x = [0.0, 0.3, 1.0, 0.7, 0.2];
        assert_relative_eq!(cosine_similarity(&x, &x).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = [0.0, 0.5, 1.0, 0.25];
        let b = [1.0, 0.0, 0.4, 0.9];

        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_similarity_is_scale_invariant() {
        let a = [0.1, 0.5, 1.0, 0.25];
        let b = [0.9, 0.0, 0.4, 1.0];
        let scaled: Vec<f64> = b.iter().map(|v| v * 37.5).collect();

        assert_relative_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&a, &scaled).unwrap(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            cosine_similarity(&a, &a.map(|v| v * 0.01)).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(MathError::LengthMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(
            cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 0.5, 0.0]),
            Err(MathError::ZeroVector)
        );
        assert!(matches!(
            cosine_similarity(&[], &[]),
            Err(MathError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_score_normalized_windows() {
        let base = normalize(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let shifted = normalize(&[101.0, 102.0, 103.0, 104.0, 105.0]).unwrap();
        let reversed = normalize(&[5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();

        assert_relative_eq!(score(&base, &shifted).unwrap(), 1.0, epsilon = 1e-12);
        assert!(score(&base, &reversed).unwrap() < 0.5);
    }
}
