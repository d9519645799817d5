use super::{Block, SectionPart, TocEntry, render_document};
use crate::models::GeneratedEbook;
use crate::session::{Phase, Session};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::{self, Write};

const STYLE: &str = r#"
    body { margin: 0; font-family: Georgia, 'Times New Roman', serif; color: #333; }
    .sans { font-family: Arial, Helvetica, sans-serif; }
    .hero { min-height: 100vh; background: #f4f4f4; display: flex; flex-direction: column; align-items: center; justify-content: center; padding: 16px; }
    .card { max-width: 560px; width: 100%; background: #fff; padding: 40px; border-radius: 8px; border-top: 8px solid #2c3e50; box-shadow: 0 10px 25px rgba(0,0,0,.15); }
    .card h1 { text-align: center; color: #2c3e50; font-family: Arial, sans-serif; }
    .card p.lead { text-align: center; color: #777; }
    .card label { display: block; font: bold 13px Arial, sans-serif; text-transform: uppercase; letter-spacing: 1px; color: #2c3e50; margin-bottom: 8px; }
    .card input { width: 100%; box-sizing: border-box; padding: 12px 16px; font-size: 18px; border: 2px solid #ddd; border-radius: 6px; }
    .card button { width: 100%; margin-top: 16px; padding: 16px; font: bold 18px Arial, sans-serif; color: #fff; background: #2c3e50; border: 0; border-radius: 6px; cursor: pointer; }
    .card button:disabled { background: #999; cursor: default; }
    .banner { margin-top: 16px; padding: 12px; background: #fef2f2; color: #dc2626; border-radius: 4px; text-align: center; font-size: 14px; }
    .powered { margin-top: 32px; color: #aaa; font-size: 14px; }
    .preview { background: #e0e0e0; padding: 72px 0 40px; }
    .control-bar { position: fixed; top: 0; left: 0; right: 0; display: flex; justify-content: space-between; align-items: center; padding: 12px 16px; background: #2c3e50; color: #fff; z-index: 10; font-family: Arial, sans-serif; }
    .control-bar form { display: inline; }
    .control-bar button { font: bold 14px Arial, sans-serif; border: 0; cursor: pointer; }
    .control-bar .new { background: none; color: #ccc; }
    .control-bar .print { background: #e74c3c; color: #fff; padding: 8px 24px; border-radius: 4px; }
    .control-bar .book-title { font-weight: bold; max-width: 320px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
    .page { max-width: 800px; margin: 0 auto 32px; background: #fff; padding: 64px; box-sizing: border-box; box-shadow: 0 4px 12px rgba(0,0,0,.15); }
    .page.cover, .page.copyright, .page.toc { min-height: 1123px; }
    .page.cover { display: flex; text-align: center; }
    .cover-frame { flex: 1; border: 8px solid #2c3e50; padding: 48px; display: flex; flex-direction: column; justify-content: center; }
    .cover-frame h1 { font: bold 56px Arial, sans-serif; color: #2c3e50; margin-bottom: 24px; }
    .cover-frame h2 { font: 24px Arial, sans-serif; color: #e74c3c; text-transform: uppercase; letter-spacing: 4px; }
    .cover-frame .byline { margin-top: auto; }
    .page.copyright { display: flex; flex-direction: column; justify-content: flex-end; font-size: 14px; color: #555; }
    .copyright .contact { color: #2980b9; }
    .toc h2 { font: bold 30px Arial, sans-serif; color: #2c3e50; border-bottom: 4px solid #2c3e50; padding-bottom: 16px; }
    .toc ul { list-style: none; padding: 0; }
    .toc li { display: flex; border-bottom: 1px solid #eee; padding: 8px 0; font-size: 18px; }
    .toc .num { color: #e74c3c; font-weight: bold; width: 40px; font-family: Arial, sans-serif; }
    .chapter-header { border-bottom: 4px solid #2c3e50; padding-bottom: 20px; margin-bottom: 32px; }
    .chapter-header span { display: block; font: bold 14px Arial, sans-serif; text-transform: uppercase; letter-spacing: 2px; color: #e74c3c; }
    .chapter-header h1 { font-size: 32px; color: #2c3e50; margin: 0; }
    .overview { background: #f9f9f9; border-left: 5px solid #e74c3c; padding: 20px; font-style: italic; color: #555; margin-bottom: 32px; }
    .concepts span { display: inline-block; background: #2c3e50; color: #fff; padding: 4px 12px; border-radius: 999px; font: 12px Arial, sans-serif; margin: 0 8px 8px 0; }
    hr { border: 0; border-top: 1px solid #eee; margin: 32px 0; }
    .section { margin-bottom: 40px; }
    .section h3 { font: bold 22px Arial, sans-serif; color: #2c3e50; }
    .example { background: #eef2f5; border-left: 4px solid #2980b9; padding: 16px; border-radius: 4px; }
    .example span { display: block; font: bold 11px Arial, sans-serif; text-transform: uppercase; color: #2980b9; margin-bottom: 4px; }
    .case-study { border: 2px solid #2c3e50; padding: 24px; margin: 40px 0; position: relative; }
    .case-study .label { position: absolute; top: -14px; left: 20px; background: #2c3e50; color: #fff; padding: 4px 16px; font: bold 13px Arial, sans-serif; text-transform: uppercase; }
    .case-study .body { white-space: pre-wrap; line-height: 1.6; }
    .checklist { background: #fff8f8; border: 1px dashed #e74c3c; padding: 24px; margin-bottom: 40px; font-family: Arial, sans-serif; }
    .checklist h3 { margin-top: 0; color: #c0392b; text-transform: uppercase; }
    .checklist li { list-style: none; }
    .checklist li::before { content: "\2610"; color: #e74c3c; margin-right: 12px; }
    .summary { background: #2c3e50; color: #fff; padding: 32px; text-align: center; border-radius: 4px; }
    .summary span { display: block; color: #e74c3c; font-weight: bold; text-transform: uppercase; letter-spacing: 3px; font-size: 14px; margin-bottom: 12px; }
    .summary p { font-style: italic; }
    .end { text-align: center; color: #777; padding-bottom: 40px; }
    .page-break { page-break-after: always; break-after: page; height: 0; }
    .section, .case-study, .checklist, .summary { page-break-inside: avoid; break-inside: avoid; }
    @media print {
        .no-print { display: none !important; }
        .preview { background: #fff; padding: 0; }
        .page { box-shadow: none; margin: 0; max-width: none; }
        .page.cover, .page.copyright, .page.toc { min-height: 100vh; }
    }
"#;

fn page_class(block: &Block) -> &'static str {
    match block {
        Block::Cover { .. } => "page cover",
        Block::Copyright { .. } => "page copyright",
        Block::TableOfContents(_) => "page toc",
        _ => "page chapter",
    }
}

fn write_list(out: &mut impl Write, items: &[String]) -> fmt::Result {
    out.write_str("<ul>")?;
    for item in items {
        write!(out, "<li>{}</li>", encode_text(item))?;
    }
    out.write_str("</ul>")
}

fn write_toc(out: &mut impl Write, entries: &[TocEntry]) -> fmt::Result {
    out.write_str("<h2>Table of Contents</h2><ul>")?;
    for entry in entries {
        write!(
            out,
            r#"<li><span class="num">{}.</span><span>{}</span></li>"#,
            entry.number,
            encode_text(&entry.title)
        )?;
    }
    out.write_str("</ul>")
}

fn write_section_part(out: &mut impl Write, part: &SectionPart) -> fmt::Result {
    match part {
        SectionPart::Explanation(text) => write!(out, "<p>{}</p>", encode_text(text)),
        SectionPart::Example(text) => write!(
            out,
            r#"<div class="example"><span>Real Life Example</span>{}</div>"#,
            encode_text(text)
        ),
        SectionPart::ActionSteps(steps) => {
            out.write_str(r#"<div class="steps"><strong>Action Steps:</strong>"#)?;
            write_list(out, steps)?;
            out.write_str("</div>")
        }
    }
}

fn write_block(out: &mut impl Write, block: &Block) -> fmt::Result {
    match block {
        Block::PageBreak => out.write_str(r#"<div class="page-break"></div>"#),
        Block::Cover {
            title,
            subtitle,
            author,
        } => write!(
            out,
            r#"<div class="cover-frame"><h1>{}</h1><h2>{}</h2><div class="byline"><p><em>Written by</em></p><p class="sans"><strong>{}</strong></p></div></div>"#,
            encode_text(title),
            encode_text(subtitle),
            encode_text(author)
        ),
        Block::Copyright {
            notice,
            disclaimer,
            contact,
        } => write!(
            out,
            r#"<p><strong>{}</strong></p><p>{}</p><p class="contact">{}</p>"#,
            encode_text(notice),
            encode_text(disclaimer),
            encode_text(contact)
        ),
        Block::TableOfContents(entries) => write_toc(out, entries),
        Block::ChapterHeader { number, title } => write!(
            out,
            r#"<div class="chapter-header"><span>Chapter {}</span><h1>{}</h1></div>"#,
            number,
            encode_text(title)
        ),
        Block::Overview(text) => write!(
            out,
            r#"<div class="overview"><strong>Overview:</strong> {}</div>"#,
            encode_text(text)
        ),
        Block::KeyConcepts(concepts) => {
            out.write_str(r#"<div class="concepts">"#)?;
            for concept in concepts {
                write!(out, "<span>{}</span>", encode_text(concept))?;
            }
            out.write_str("</div>")
        }
        Block::Rule => out.write_str("<hr>"),
        Block::PracticalSection {
            number,
            title,
            parts,
        } => {
            write!(
                out,
                r#"<div class="section"><h3>{}. {}</h3>"#,
                number,
                encode_text(title)
            )?;
            for part in parts {
                write_section_part(out, part)?;
            }
            out.write_str("</div>")
        }
        Block::CaseStudy(text) => write!(
            out,
            r#"<div class="case-study"><div class="label">Case Study</div><div class="body">{}</div></div>"#,
            encode_text(text)
        ),
        Block::Checklist { chapter, items } => {
            write!(out, r#"<div class="checklist"><h3>Chapter {} Checklist</h3>"#, chapter)?;
            write_list(out, items)?;
            out.write_str("</div>")
        }
        Block::Summary(text) => write!(
            out,
            r#"<div class="summary"><span>Chapter Summary</span><p>{}</p></div>"#,
            encode_text(text)
        ),
    }
}

/// Block sequence rendered as pages; everything between page breaks is one page.
struct Pages<'a>(&'a [Block]);

impl fmt::Display for Pages<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut page_open = false;

        for block in self.0 {
            if *block == Block::PageBreak {
                if page_open {
                    f.write_str("</section>")?;
                    page_open = false;
                }
            } else if !page_open {
                write!(f, r#"<section class="{}">"#, page_class(block))?;
                page_open = true;
            }
            write_block(f, block)?;
        }
        if page_open {
            f.write_str("</section>")?;
        }
        Ok(())
    }
}

pub fn blocks_to_html(blocks: &[Block]) -> String {
    Pages(blocks).to_string()
}
fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body>
{}
</body>
</html>
"#,
        encode_text(title),
        STYLE,
        body
    )
}

/// Topic form shown while idle, generating or after an error.
pub fn input_page(session: &Session) -> String {
    let generating = session.phase() == Phase::Generating;
    let disabled = if generating { " disabled" } else { "" };
    let button = if generating {
        "Generating Content..."
    } else {
        "Build Ebook"
    };
    let banner = session
        .error()
        .map(|message| format!(r#"<div class="banner">{}</div>"#, encode_text(message)))
        .unwrap_or_default();

    let body = format!(
        r#"<main class="hero">
<div class="card">
<h1>AI Ebook Generator</h1>
<p class="lead">Enter a niche or topic, and we'll write a professionally styled ebook for you in seconds.</p>
<form method="post" action="/generate" onsubmit="this.querySelector('button').disabled = true; this.querySelector('button').textContent = 'Generating Content...';">
<label for="topic">What is your ebook about?</label>
<input type="text" id="topic" name="topic" placeholder="e.g. Urban Gardening, Python for Beginners, Stoicism..." value="{}"{} required>
{}
<button type="submit"{}>{}</button>
</form>
</div>
<p class="powered">Powered by Gemini API</p>
</main>"#,
        encode_double_quoted_attribute(session.topic()),
        disabled,
        banner,
        disabled,
        button
    );

    layout("AI Ebook Generator", &body)
}

/// Printable document with a control bar that is hidden when printing.
pub fn preview_page(ebook: &GeneratedEbook) -> String {
    let body = format!(
        r#"<div class="preview">
<div class="control-bar no-print">
<div>
<form method="post" action="/reset"><button type="submit" class="new">&larr; Create New</button></form>
<span class="book-title">{}</span>
</div>
<button type="button" class="print" onclick="window.print()">Save as PDF</button>
</div>
{}
<div class="end no-print"><p>End of Preview</p></div>
</div>"#,
        encode_text(ebook.title()),
        blocks_to_html(&render_document(ebook))
    );

    layout(ebook.title(), &body)
}

pub fn session_page(session: &Session) -> String {
    match (session.phase(), session.ebook()) {
        (Phase::Complete, Some(ebook)) => preview_page(ebook),
        _ => input_page(session),
    }
}
