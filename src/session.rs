use crate::models::{GeneratedEbook, GenerationRequest};
use crate::services::generator::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
    Complete,
    Error,
}

/// Process-wide state behind the single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    phase: Phase,
    topic: String,
    ebook: Option<GeneratedEbook>,
    error: Option<String>,
}

impl Session {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn ebook(&self) -> Option<&GeneratedEbook> {
        self.ebook.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts a generation for `topic`.
    ///
    /// Returns `None` and leaves the session untouched when the topic is blank,
    /// a request is already in flight, or a finished document is on screen.
    pub fn begin(&mut self, topic: &str) -> Option<GenerationRequest> {
        if !matches!(self.phase, Phase::Idle | Phase::Error) {
            return None;
        }
        let request = GenerationRequest::new(topic)?;

        self.topic = topic.to_string();
        self.phase = Phase::Generating;
        self.error = None;
        Some(request)
    }

    pub fn finish(&mut self, outcome: Result<GeneratedEbook, GenerationError>) {
        if self.phase != Phase::Generating {
            tracing::warn!(phase = ?self.phase, "Ignoring generation result outside of generating phase");
            return;
        }

        match outcome {
            Ok(ebook) => {
                self.ebook = Some(ebook);
                self.phase = Phase::Complete;
            }
            Err(err) => {
                tracing::error!(error = %err, topic = %self.topic, "Ebook generation failed");
                self.ebook = None;
                self.error = Some(err.user_message().to_string());
                self.phase = Phase::Error;
            }
        }
    }

    /// Back to an empty input. Not available while generating.
    pub fn reset(&mut self) -> bool {
        if self.phase == Phase::Generating {
            return false;
        }
        *self = Session::default();
        true
    }
}
