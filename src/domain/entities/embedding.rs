use serde::{Deserialize, Serialize};

/// Dense vector for a chunk of knowledge text or a search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Cosine similarity in `[-1, 1]`; mismatched or zero vectors score 0.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.dimension() != other.dimension() || self.0.is_empty() {
            return 0.0;
        }

        let (dot, norm_a, norm_b) = self
            .0
            .iter()
            .zip(&other.0)
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (a, b)| {
                (dot + a * b, na + a * a, nb + b * b)
            });

        let denom = norm_a.sqrt() * norm_b.sqrt();
        if denom == 0.0 {
            0.0
        } else {
            dot / denom
        }
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl From<Vec<f64>> for Embedding {
    fn from(values: Vec<f64>) -> Self {
        Self(values.into_iter().map(|v| v as f32).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![0.0, 1.0]);

        assert!((a.cosine_similarity(&a) - 1.0).abs() < 1e-6);
        assert!(a.cosine_similarity(&b).abs() < 1e-6);
        assert_eq!(a.cosine_similarity(&Embedding::new(vec![1.0])), 0.0);
        assert_eq!(a.cosine_similarity(&Embedding::new(vec![0.0, 0.0])), 0.0);
    }
}
