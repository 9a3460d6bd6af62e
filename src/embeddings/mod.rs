//! Embedding providers
//!
//! Embeddings are an external capability: something turns text into a
//! fixed-length vector. Everything that talks to a provider goes through
//! [`embed_text`], which owns the input contract (newlines become spaces,
//! then the text is cut to [`MAX_INPUT_CHARS`] characters) and the output
//! contract (exactly [`EMBEDDING_DIM`] finite values).

use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::error::{PartDbError, Result};

pub mod hash;
pub mod openai;
pub mod refresh;

pub use hash::HashEmbedder;
pub use openai::OpenAiEmbedder;
pub use refresh::{EmbeddingRefresher, SweepFailure, SweepOutcome, SweepReport, SweepScope};

/// Dimension of every stored embedding.
pub const EMBEDDING_DIM: usize = 1536;

/// Longest input, in characters, ever sent to a provider.
pub const MAX_INPUT_CHARS: usize = 8191;

/// Something that can embed a piece of text.
pub trait EmbeddingProvider {
    /// Short backend name for logs and output.
    fn name(&self) -> &str;

    /// Embed already-prepared input. Callers should use [`embed_text`].
    fn embed(&self, input: &str) -> Result<Vec<f32>>;
}

/// Normalize text for the provider: newlines to spaces, then truncate.
pub fn prepare_input(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .take(MAX_INPUT_CHARS)
        .collect()
}

/// Embed `text` through `provider`, enforcing the boundary contract.
///
/// Any failure comes back as [`PartDbError::EmbeddingUnavailable`] (or a
/// configuration error); nothing is written anywhere by this function.
pub fn embed_text(provider: &dyn EmbeddingProvider, text: &str) -> Result<Vec<f32>> {
    let input = prepare_input(text);
    debug!(
        target: "embeddings",
        provider = provider.name(),
        chars = input.chars().count(),
        "requesting embedding"
    );

    let vector = provider.embed(&input).map_err(|err| match err {
        PartDbError::EmbeddingUnavailable(_)
        | PartDbError::Config(_)
        | PartDbError::MissingConfig(_) => err,
        other => PartDbError::EmbeddingUnavailable(other.to_string()),
    })?;

    if vector.len() != EMBEDDING_DIM {
        return Err(PartDbError::EmbeddingUnavailable(format!(
            "{} returned {} dimensions, expected {EMBEDDING_DIM}",
            provider.name(),
            vector.len()
        )));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(PartDbError::EmbeddingUnavailable(format!(
            "{} returned a non-finite value",
            provider.name()
        )));
    }
    Ok(vector)
}

/// Build the provider selected by configuration.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    match config.backend.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiEmbedder::from_config(config)?)),
        "hash" => Ok(Box::new(HashEmbedder::new(EMBEDDING_DIM))),
        other => Err(PartDbError::Config(format!(
            "unknown embedding backend '{other}' (expected openai|hash)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingEmbedder, RecordingEmbedder};

    #[test]
    fn prepare_input_replaces_newlines_and_truncates() {
        let text = "ab\n".repeat(3000);
        assert_eq!(text.chars().count(), 9000);

        let prepared = prepare_input(&text);
        assert_eq!(prepared.chars().count(), MAX_INPUT_CHARS);
        assert!(!prepared.contains('\n'));
        assert!(prepared.starts_with("ab ab "));
    }

    #[test]
    fn prepare_input_counts_characters_not_bytes() {
        let text = "µ".repeat(MAX_INPUT_CHARS + 10);
        let prepared = prepare_input(&text);
        assert_eq!(prepared.chars().count(), MAX_INPUT_CHARS);
        assert_eq!(prepared.len(), MAX_INPUT_CHARS * 'µ'.len_utf8());
    }

    #[test]
    fn embed_text_sends_prepared_input() {
        let provider = RecordingEmbedder::new();
        let description = format!("line one\nline two\n{}", "x".repeat(9000));

        embed_text(&provider, &description).unwrap();

        let seen = provider.inputs();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].chars().count(), MAX_INPUT_CHARS);
        assert!(seen[0].starts_with("line one line two x"));
    }

    #[test]
    fn embed_text_rejects_wrong_dimension() {
        let provider = RecordingEmbedder::with_dim(3);
        let err = embed_text(&provider, "bolt").unwrap_err();
        assert!(matches!(err, PartDbError::EmbeddingUnavailable(_)));
    }

    #[test]
    fn embed_text_surfaces_provider_failure() {
        let err = embed_text(&FailingEmbedder, "bolt").unwrap_err();
        assert!(matches!(err, PartDbError::EmbeddingUnavailable(_)));
    }

    #[test]
    fn build_embedder_rejects_unknown_backend() {
        let config = EmbeddingConfig {
            backend: "word2vec".to_string(),
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            build_embedder(&config),
            Err(PartDbError::Config(_))
        ));
    }

    #[test]
    fn build_embedder_hash_backend() {
        let config = EmbeddingConfig {
            backend: "hash".to_string(),
            ..EmbeddingConfig::default()
        };
        let provider = build_embedder(&config).unwrap();
        assert_eq!(provider.name(), "hash");
        assert_eq!(embed_text(provider.as_ref(), "x").unwrap().len(), EMBEDDING_DIM);
    }
}
