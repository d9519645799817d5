//! Projection of a generated ebook into display blocks.
//!
//! Every function here is pure: the same input always yields the same blocks.
//! Optional parts of a chapter are emitted only when their source is present
//! (non-blank strings, non-empty lists).

pub mod html;

use crate::models::{
    Chapter, CopyrightPage, CoverPage, GeneratedEbook, PracticalSection, TableOfContents,
};
use crate::utils::{has_items, has_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub number: usize,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionPart {
    Explanation(String),
    Example(String),
    ActionSteps(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Ends the current printed page.
    PageBreak,
    Cover {
        title: String,
        subtitle: String,
        author: String,
    },
    Copyright {
        notice: String,
        disclaimer: String,
        contact: String,
    },
    TableOfContents(Vec<TocEntry>),
    ChapterHeader {
        number: usize,
        title: String,
    },
    Overview(String),
    KeyConcepts(Vec<String>),
    Rule,
    PracticalSection {
        number: usize,
        title: String,
        parts: Vec<SectionPart>,
    },
    /// Line breaks in the text are significant.
    CaseStudy(String),
    Checklist {
        chapter: usize,
        items: Vec<String>,
    },
    Summary(String),
}

pub fn render_cover(cover: &CoverPage) -> Vec<Block> {
    vec![Block::Cover {
        title: cover.title.clone(),
        subtitle: cover.subtitle.clone(),
        author: cover.author.clone(),
    }]
}

pub fn render_copyright(copyright: &CopyrightPage) -> Vec<Block> {
    vec![Block::Copyright {
        notice: copyright.copyright_notice.clone(),
        disclaimer: copyright.disclaimer.clone(),
        contact: copyright.website_or_contact.clone(),
    }]
}

pub fn render_table_of_contents(toc: &TableOfContents) -> Vec<Block> {
    let entries = toc
        .chapters
        .iter()
        .enumerate()
        .map(|(idx, title)| TocEntry {
            number: idx + 1,
            title: title.clone(),
        })
        .collect();
    vec![Block::TableOfContents(entries)]
}

fn text_block(text: &str, block: fn(String) -> Block) -> Option<Block> {
    has_text(text).then(|| block(text.to_string()))
}

fn list_block(items: &[String], block: impl FnOnce(Vec<String>) -> Block) -> Option<Block> {
    has_items(items).then(|| block(items.to_vec()))
}

pub fn render_practical_section(section: &PracticalSection, number: usize) -> Block {
    let parts = [
        has_text(&section.explanation)
            .then(|| SectionPart::Explanation(section.explanation.clone())),
        has_text(&section.example).then(|| SectionPart::Example(section.example.clone())),
        has_items(&section.action_steps)
            .then(|| SectionPart::ActionSteps(section.action_steps.clone())),
    ];

    Block::PracticalSection {
        number,
        title: section.section_title.clone(),
        parts: parts.into_iter().flatten().collect(),
    }
}

/// Renders one chapter; `number` is its 1-based position in the book.
pub fn render_chapter(chapter: &Chapter, number: usize) -> Vec<Block> {
    let mut blocks = vec![Block::ChapterHeader {
        number,
        title: chapter.chapter_title.clone(),
    }];

    blocks.extend(text_block(&chapter.overview, Block::Overview));
    blocks.extend(list_block(&chapter.key_concepts, Block::KeyConcepts));
    blocks.push(Block::Rule);
    blocks.extend(
        chapter
            .practical_sections
            .iter()
            .enumerate()
            .map(|(idx, section)| render_practical_section(section, idx + 1)),
    );
    blocks.extend(text_block(&chapter.case_study, Block::CaseStudy));
    blocks.extend(list_block(&chapter.checklist, |items| Block::Checklist {
        chapter: number,
        items,
    }));
    blocks.extend(text_block(&chapter.summary, Block::Summary));

    blocks
}

/// The whole book, one printed page per cover, copyright, contents and chapter.
pub fn render_document(ebook: &GeneratedEbook) -> Vec<Block> {
    let meta = &ebook.ebook;
    let pages = [
        render_cover(&meta.cover_page),
        render_copyright(&meta.copyright_page),
        render_table_of_contents(&meta.table_of_contents),
    ]
    .into_iter()
    .chain(
        ebook
            .chapters
            .iter()
            .enumerate()
            .map(|(idx, chapter)| render_chapter(chapter, idx + 1)),
    );

    let mut blocks = Vec::new();
    for page in pages {
        blocks.extend(page);
        blocks.push(Block::PageBreak);
    }
    blocks
}
