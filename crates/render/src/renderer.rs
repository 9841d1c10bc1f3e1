//! Transforms an upstream reply into the three HTML fragments the client
//! inserts directly into the page.
//!
//! Rendering happens server-side, at the boundary that knows the citation
//! schema, so the client only ever performs a single fragment insertion and
//! never re-derives structure from raw JSON.

use catena_common::error::{CatenaError, CatenaResult};
use catena_common::types::{ChatApiReply, Citation};
use serde::{Deserialize, Serialize};

use crate::escape::escape;

pub const EMPTY_CITATIONS_HTML: &str =
    r#"<p class="empty-state">Không có trích dẫn cho câu trả lời này.</p>"#;
pub const EMPTY_QUESTIONS_HTML: &str =
    r#"<p class="empty-state">Không có câu hỏi liên quan.</p>"#;
pub const NO_SOURCE_INFO: &str = "Không có thông tin nguồn";

/// Pre-rendered fragments for one turn, plus the untouched upstream reply
/// for diagnostic consumption by the caller. Derived and transient:
/// recomputed on every turn, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedTurn {
    pub message_html: String,
    pub citations_html: String,
    pub questions_html: String,
    #[serde(rename = "rawData")]
    pub raw: ChatApiReply,
}

/// Render one upstream reply into fragments.
///
/// Fails with `MalformedReply` when `choices[0].message.content` is absent.
/// That is a data-contract violation by the upstream, fatal for this request
/// only.
pub fn render_turn(reply: &ChatApiReply) -> CatenaResult<RenderedTurn> {
    let content = reply.first_content().ok_or_else(|| {
        CatenaError::MalformedReply("missing choices[0].message.content".to_string())
    })?;

    let message_html = format!(r#"<div class="message assistant">{}</div>"#, escape(content));

    let citations_html = if reply.citations.is_empty() {
        EMPTY_CITATIONS_HTML.to_string()
    } else {
        let items: String = reply.citations.iter().map(citation_item).collect();
        format!(r#"<div class="citations-container">{items}</div>"#)
    };

    let questions_html = if reply.related_questions.is_empty() {
        EMPTY_QUESTIONS_HTML.to_string()
    } else {
        let items: String = reply
            .related_questions
            .iter()
            .map(|question| {
                // The escaped value doubles as the data attribute so a click
                // handler can recover the exact question text.
                let safe = escape(question);
                format!(r#"<div class="related-question" data-question="{safe}">{safe}</div>"#)
            })
            .collect();
        format!(r#"<div class="related-questions-container">{items}</div>"#)
    };

    Ok(RenderedTurn {
        message_html,
        citations_html,
        questions_html,
        raw: reply.clone(),
    })
}

fn citation_item(citation: &Citation) -> String {
    format!(
        r#"<div class="citation-item"><div class="citation-text">{}</div><div class="citation-source">{}</div></div>"#,
        escape(&citation.cited_text),
        source_line(citation)
    )
}

/// One source-description line: title, `- author`, `(year)`, `Ref: reference`
/// in fixed order, absent fields skipped, joined by single spaces, each
/// sub-field independently escaped.
fn source_line(citation: &Citation) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    if let Some(title) = present(&citation.document_title) {
        parts.push(escape(title));
    }
    if let Some(author) = present(&citation.document_author) {
        parts.push(format!("- {}", escape(author)));
    }
    if let Some(year) = present(&citation.document_year) {
        parts.push(format!("({})", escape(year)));
    }
    if let Some(reference) = present(&citation.document_reference) {
        parts.push(format!("Ref: {}", escape(reference)));
    }

    if parts.is_empty() {
        NO_SOURCE_INFO.to_string()
    } else {
        parts.join(" ")
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
