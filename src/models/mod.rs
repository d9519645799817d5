use serde::{Deserialize, Serialize};

/// A topic accepted for generation. Only exists for non-blank topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topic: String,
}

impl GenerationRequest {
    pub fn new(topic: &str) -> Option<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }
        Some(GenerationRequest {
            topic: topic.to_string(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverPage {
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyrightPage {
    pub copyright_notice: String,
    pub disclaimer: String,
    pub website_or_contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub chapters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticalSection {
    pub section_title: String,
    pub explanation: String,
    pub example: String,
    pub action_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub chapter_title: String,
    pub overview: String,
    pub key_concepts: Vec<String>,
    pub practical_sections: Vec<PracticalSection>,
    pub case_study: String,
    pub checklist: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbookMetadata {
    pub cover_page: CoverPage,
    pub copyright_page: CopyrightPage,
    pub table_of_contents: TableOfContents,
}

/// Root result of one successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedEbook {
    pub ebook: EbookMetadata,
    pub chapters: Vec<Chapter>,
}

impl GeneratedEbook {
    pub fn title(&self) -> &str {
        &self.ebook.cover_page.title
    }

    /// The service is asked for matching counts but nothing forces it.
    pub fn toc_matches_chapters(&self) -> bool {
        self.ebook.table_of_contents.chapters.len() == self.chapters.len()
    }
}
