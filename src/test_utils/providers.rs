//! Embedding providers for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::embeddings::{EMBEDDING_DIM, EmbeddingProvider};
use crate::error::{PartDbError, Result};

/// Unit vector along dimension `i` (modulo the embedding dimension).
pub fn axis(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; EMBEDDING_DIM];
    v[i % EMBEDDING_DIM] = 1.0;
    v
}

/// Always fails, like a provider that is down.
pub struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn name(&self) -> &str {
        "failing"
    }

    fn embed(&self, _input: &str) -> Result<Vec<f32>> {
        Err(PartDbError::EmbeddingUnavailable(
            "provider offline".to_string(),
        ))
    }
}

/// Records every input it receives and answers with a fixed vector.
pub struct RecordingEmbedder {
    dim: usize,
    inputs: Mutex<Vec<String>>,
}

impl Default for RecordingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingEmbedder {
    pub fn new() -> Self {
        Self::with_dim(EMBEDDING_DIM)
    }

    pub const fn with_dim(dim: usize) -> Self {
        Self {
            dim,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs
            .lock()
            .map(|inputs| inputs.clone())
            .unwrap_or_default()
    }
}

impl EmbeddingProvider for RecordingEmbedder {
    fn name(&self) -> &str {
        "recording"
    }

    fn embed(&self, input: &str) -> Result<Vec<f32>> {
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(input.to_string());
        }
        let mut v = vec![0.0; self.dim];
        if let Some(first) = v.first_mut() {
            *first = 1.0;
        }
        Ok(v)
    }
}

/// Answers from a fixed table; unknown text is an outage.
#[derive(Default)]
pub struct StaticEmbedder {
    table: HashMap<String, Vec<f32>>,
}

impl StaticEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.table.insert(text.to_string(), vector);
        self
    }
}

impl EmbeddingProvider for StaticEmbedder {
    fn name(&self) -> &str {
        "static"
    }

    fn embed(&self, input: &str) -> Result<Vec<f32>> {
        self.table.get(input).cloned().ok_or_else(|| {
            PartDbError::EmbeddingUnavailable(format!("no vector for '{input}'"))
        })
    }
}

/// Hash embeddings except for one poisoned input, which fails.
pub struct FlakyEmbedder {
    poisoned: String,
    inner: crate::embeddings::HashEmbedder,
}

impl FlakyEmbedder {
    pub fn failing_on(poisoned: &str) -> Self {
        Self {
            poisoned: poisoned.to_string(),
            inner: crate::embeddings::HashEmbedder::new(EMBEDDING_DIM),
        }
    }
}

impl EmbeddingProvider for FlakyEmbedder {
    fn name(&self) -> &str {
        "flaky"
    }

    fn embed(&self, input: &str) -> Result<Vec<f32>> {
        if input == self.poisoned {
            return Err(PartDbError::EmbeddingUnavailable(format!(
                "timeout embedding '{input}'"
            )));
        }
        self.inner.embed(input)
    }
}
