//! Hash embeddings
//!
//! FNV-1a feature hashing of words and character trigrams into a fixed
//! number of buckets. No model, no network, fully deterministic. Good enough
//! to rank "red led" near "LED, red, 5mm" and a long way from "m3 nut".

use crate::embeddings::EmbeddingProvider;
use crate::error::Result;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Hash embedder using FNV-1a
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    /// Create embedder with specified dimension
    pub const fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Embed text into an L2-normalized vector (all zeros for text without
    /// any word characters).
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dim];
        if self.dim == 0 {
            return vector;
        }

        let lowered = text.to_lowercase();
        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            self.add_feature(&mut vector, word.as_bytes(), 1.0);

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                self.add_feature(&mut vector, gram.as_bytes(), 0.5);
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    fn add_feature(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let bucket = usize::try_from(hash % self.dim as u64).unwrap_or(0);
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn embed(&self, input: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(input))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
