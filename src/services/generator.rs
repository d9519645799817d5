use crate::models::{GeneratedEbook, GenerationRequest};
use crate::services::llm::{JSON_MIME_TYPE, StructuredRequest, TextGenerator};
use crate::services::schema::ebook_schema;
use thiserror::Error;

/// Moderately high so chapters read differently between runs.
pub const TEMPERATURE: f32 = 0.7;

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to generate ebook. Please try again or check your API key.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no content generated")]
    EmptyResponse,
    #[error("generated content is not a valid ebook: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error("generation service call failed: {0}")]
    Service(anyhow::Error),
}

impl GenerationError {
    /// Every cause is reported to the user the same way.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"Write a comprehensive, professional, and practical ebook about: "{topic}".

The ebook should have:
1. A catchy title and subtitle.
2. A realistic copyright page.
3. A table of contents with 3 to 5 engaging chapters.
4. 3 to 5 detailed chapters. Each chapter must include:
   - An overview.
   - 3 to 8 key concepts (tags).
   - 2-3 Practical Subchapters (sections) with explanations, real-life examples, and at least 3 actionable steps.
   - A short case study.
   - A checklist for the reader.
   - A summary.

Ensure the content is high-quality, educational, and formatted strictly according to the JSON schema provided."#
    )
}

pub fn structured_request(request: &GenerationRequest) -> StructuredRequest {
    StructuredRequest {
        prompt: build_prompt(request.topic()),
        schema: ebook_schema(),
        response_mime_type: JSON_MIME_TYPE,
        temperature: TEMPERATURE,
    }
}

pub fn parse_ebook(text: Option<&str>) -> Result<GeneratedEbook, GenerationError> {
    let text = text
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)?;
    Ok(serde_json::from_str(text)?)
}

/// Issues exactly one generation call for `request`. No retries.
pub async fn generate(
    request: &GenerationRequest,
    backend: &dyn TextGenerator,
) -> Result<GeneratedEbook, GenerationError> {
    tracing::info!(topic = request.topic(), "Generating ebook");

    let text = backend
        .generate_structured(&structured_request(request))
        .await
        .map_err(GenerationError::Service)?;

    let ebook = parse_ebook(text.as_deref())?;

    if !ebook.toc_matches_chapters() {
        tracing::warn!(
            toc_entries = ebook.ebook.table_of_contents.chapters.len(),
            chapters = ebook.chapters.len(),
            "Table of contents does not match chapter count"
        );
    }
    tracing::info!(chapters = ebook.chapters.len(), title = ebook.title(), "Ebook generated");

    Ok(ebook)
}
