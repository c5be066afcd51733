//! Resume Evaluator: extraction → embedding similarity → keyword coverage.
//!
//! Either the full `EvaluationResult` is produced or an error is returned;
//! there is no partial result.

use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::evaluation::extract::extract_text;
use crate::evaluation::keywords::KeywordMatcher;
use crate::evaluation::profile::JobProfile;
use crate::evaluation::similarity::{cosine_similarity, scale_score, Embedder};

/// Outcome of scoring one resume against the job profile.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub score: u32, // 0 – 100
    /// Matched keywords, in profile order.
    pub keywords: Vec<String>,
    pub summary: String,
}

pub struct ResumeEvaluator {
    profile: JobProfile,
    matcher: KeywordMatcher,
    embedder: Arc<dyn Embedder>,
}

impl ResumeEvaluator {
    pub fn new(profile: JobProfile, embedder: Arc<dyn Embedder>) -> anyhow::Result<Self> {
        let matcher = KeywordMatcher::new(&profile.keywords)?;
        Ok(Self {
            profile,
            matcher,
            embedder,
        })
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Scores raw upload bytes. `content_type` selects PDF or text extraction.
    pub async fn evaluate(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<EvaluationResult, AppError> {
        let owned_type = content_type.to_string();
        // PDF parsing can be slow on large documents; run it on the blocking pool.
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes, &owned_type))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

        self.evaluate_text(&text).await
    }

    pub async fn evaluate_text(&self, text: &str) -> Result<EvaluationResult, AppError> {
        let vectors = self
            .embedder
            .embed(vec![text.to_string(), self.profile.description.clone()])
            .await?;
        let [resume_vec, job_vec] = vectors.as_slice() else {
            return Err(AppError::ModelInference(format!(
                "expected 2 embeddings, got {}",
                vectors.len()
            )));
        };

        let similarity = cosine_similarity(resume_vec, job_vec);
        let score = scale_score(similarity);

        let coverage = self.matcher.match_text(text);
        let summary = coverage.summary();

        info!(
            score,
            similarity,
            found = coverage.found.len(),
            missing = coverage.missing.len(),
            text_chars = text.chars().count(),
            "Resume evaluated"
        );

        Ok(EvaluationResult {
            score,
            keywords: coverage.found,
            summary,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_embedder::{FailingEmbedder, LetterEmbedder};
    use super::*;
    use crate::evaluation::extract::{build_test_pdf, PDF_CONTENT_TYPE, TEXT_CONTENT_TYPE};

    fn evaluator() -> ResumeEvaluator {
        ResumeEvaluator::new(JobProfile::default(), Arc::new(LetterEmbedder)).unwrap()
    }

    #[tokio::test]
    async fn test_same_text_scores_identically() {
        let ev = evaluator();
        let bytes = b"Python engineer with a focus on teamwork".to_vec();
        let first = ev.evaluate(bytes.clone(), TEXT_CONTENT_TYPE).await.unwrap();
        let second = ev.evaluate(bytes, TEXT_CONTENT_TYPE).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_reference_text_scores_top_marks() {
        let ev = evaluator();
        let description = JobProfile::default().description;
        let result = ev.evaluate_text(&description).await.unwrap();
        // f32 rounding can leave an identical pair a hair under 1.0
        assert!(result.score >= 99, "got {}", result.score);
        assert_eq!(result.summary, "Great match!");
    }

    #[tokio::test]
    async fn test_empty_text_flows_through() {
        let result = evaluator().evaluate(Vec::new(), TEXT_CONTENT_TYPE).await.unwrap();
        assert_eq!(result.score, 0);
        assert!(result.keywords.is_empty());
        assert!(result.summary.starts_with("Your resume matches 0 out of 6"));
    }

    #[tokio::test]
    async fn test_score_is_bounded() {
        let result = evaluator()
            .evaluate_text("zzzz qqqq xxxx data analysis")
            .await
            .unwrap();
        assert!(result.score <= 100);
        assert_eq!(result.keywords, vec!["data analysis"]);
    }

    #[tokio::test]
    async fn test_pdf_upload_is_extracted_before_scoring() {
        let pdf = build_test_pdf(&[Some("Python developer")]);
        let result = evaluator().evaluate(pdf, PDF_CONTENT_TYPE).await.unwrap();
        assert_eq!(result.keywords, vec!["Python"]);
    }

    #[tokio::test]
    async fn test_malformed_pdf_propagates() {
        let err = evaluator()
            .evaluate(b"plainly not a pdf".to_vec(), PDF_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedDocument(_)));
    }

    #[tokio::test]
    async fn test_model_failure_yields_no_partial_result() {
        let ev = ResumeEvaluator::new(JobProfile::default(), Arc::new(FailingEmbedder)).unwrap();
        let err = ev.evaluate_text("Python").await.unwrap_err();
        assert!(matches!(err, AppError::ModelInference(_)));
    }

    #[tokio::test]
    async fn test_custom_profile_is_used() {
        let profile = JobProfile::new("Rust systems engineer", vec!["Rust".to_string()]);
        let ev = ResumeEvaluator::new(profile, Arc::new(LetterEmbedder)).unwrap();
        let result = ev.evaluate_text("I write rust").await.unwrap();
        assert_eq!(result.keywords, vec!["Rust"]);
        assert_eq!(result.summary, "Great match!");
    }
}
