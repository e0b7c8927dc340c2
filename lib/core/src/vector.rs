use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Marker for an embedding family. Families are never compared with each other.
pub trait Family: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    const NAME: &'static str;
}

/// Image-encoder output space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visual;

/// Text-encoder output space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantic;

impl Family for Visual {
    const NAME: &'static str = "visual";
}

impl Family for Semantic {
    const NAME: &'static str = "semantic";
}

/// A fixed-length embedding tagged with the family that produced it
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Embedding<F: Family> {
    data: Vec<f32>,
    #[serde(skip)]
    family: PhantomData<F>,
}

pub type VisualEmbedding = Embedding<Visual>;
pub type TextEmbedding = Embedding<Semantic>;

impl<F: Family> fmt::Debug for Embedding<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Embedding<{}>(dim={})", F::NAME, self.data.len())
    }
}

impl<F: Family> Embedding<F> {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data,
            family: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self::new(data.to_vec())
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Cosine similarity in [-1, 1]. Mismatched dimensions and zero vectors give 0.
    #[inline]
    pub fn cosine_similarity(&self, other: &Self) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let dot: f32 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum();
        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }

    /// Cosine distance in [0, 2]: 0 for identical direction, 2 for opposite.
    #[inline]
    pub fn cosine_distance(&self, other: &Self) -> f32 {
        1.0 - self.cosine_similarity(other)
    }

    /// Normalize to unit length in place
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl<F: Family> From<Vec<f32>> for Embedding<F> {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}
