use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

use extract::schema::EntityRecord;

use crate::colors::entity_color;
use crate::resolve::resolve_overlaps;
use crate::span::{Span, locate_spans};

/// Default ceiling on rendered markup size, mirroring the bounded preview
/// behavior of the display layer.
pub const DEFAULT_MAX_MARKUP_LEN: usize = 100_000;

pub const TRUNCATION_MARKER: &str = "... (truncated)";

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub max_markup_len: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_markup_len: DEFAULT_MAX_MARKUP_LEN,
        }
    }
}

/// Renderer output. `Nothing` is the "nothing to visualize" sentinel for
/// empty text or an empty entity list; callers must check for it rather than
/// treat it as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Nothing,
    Markup(String),
}

impl Rendered {
    pub fn as_markup(&self) -> Option<&str> {
        match self {
            Rendered::Markup(html) => Some(html),
            Rendered::Nothing => None,
        }
    }

    pub fn into_markup(self) -> Option<String> {
        match self {
            Rendered::Markup(html) => Some(html),
            Rendered::Nothing => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderDiagnostics {
    pub spans_located: usize,
    pub spans_accepted: usize,
    pub spans_dropped: usize,
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct RenderResult {
    pub rendered: Rendered,
    pub diagnostics: RenderDiagnostics,
}

/// Render `source` with color-coded highlight wrappers around every accepted
/// entity occurrence. Pure: locate all occurrences, resolve overlaps, then
/// interleave escaped text segments with styled spans.
pub fn render_highlights(
    source: &str,
    entities: &[EntityRecord],
    config: &RenderConfig,
) -> RenderResult {
    let mut diagnostics = RenderDiagnostics::default();

    if source.is_empty() || entities.is_empty() {
        return RenderResult {
            rendered: Rendered::Nothing,
            diagnostics,
        };
    }

    let mut candidates = Vec::new();
    for record in entities {
        let color = entity_color(&record.label);
        for m in locate_spans(source, &record.text) {
            candidates.push(Span {
                start: m.start,
                end: m.end,
                text: m.text,
                label: record.label.clone(),
                color,
            });
        }
    }
    diagnostics.spans_located = candidates.len();

    let accepted = resolve_overlaps(candidates);
    diagnostics.spans_accepted = accepted.len();
    diagnostics.spans_dropped = diagnostics.spans_located - accepted.len();

    let mut html = String::with_capacity(source.len() + accepted.len() * 64);
    let mut cursor = 0usize;
    for span in &accepted {
        html.push_str(&encode_text(&source[cursor..span.start]));
        push_wrapper(&mut html, span);
        cursor = span.end;
    }
    html.push_str(&encode_text(&source[cursor..]));

    if html.len() > config.max_markup_len {
        let mut cut = config.max_markup_len;
        while !html.is_char_boundary(cut) {
            cut -= 1;
        }
        html.truncate(cut);
        html.push_str(TRUNCATION_MARKER);
        diagnostics.truncated = true;
    }

    RenderResult {
        rendered: Rendered::Markup(html),
        diagnostics,
    }
}

fn push_wrapper(html: &mut String, span: &Span) {
    html.push_str("<span style=\"background-color: ");
    html.push_str(span.color);
    html.push_str("; padding: 2px; border-radius: 3px;\" title=\"");
    html.push_str(&encode_double_quoted_attribute(&span.label));
    html.push_str("\">");
    html.push_str(&encode_text(&span.text));
    html.push_str("</span>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(text: &str, label: &str) -> EntityRecord {
        EntityRecord {
            text: text.to_string(),
            label: label.to_string(),
        }
    }

    fn render(source: &str, entities: &[EntityRecord]) -> RenderResult {
        render_highlights(source, entities, &RenderConfig::default())
    }

    #[test]
    fn empty_source_returns_sentinel() {
        let result = render("", &[entity("aspirin", "DRUG")]);
        assert_eq!(result.rendered, Rendered::Nothing);
    }

    #[test]
    fn empty_entity_list_returns_sentinel() {
        let result = render("some text", &[]);
        assert_eq!(result.rendered, Rendered::Nothing);
        assert_eq!(result.diagnostics.spans_located, 0);
    }

    #[test]
    fn wraps_occurrences_with_label_and_color() {
        let result = render("Aspirin treats headaches.", &[entity("Aspirin", "DRUG")]);
        let html = result.rendered.as_markup().unwrap();
        assert!(html.contains("background-color: #8aff80"));
        assert!(html.contains("title=\"DRUG\""));
        assert!(html.contains(">Aspirin</span>"));
        assert!(html.ends_with(" treats headaches."));
    }

    #[test]
    fn source_markup_characters_are_escaped() {
        let result = render("dose <5mg> & rising", &[entity("rising", "SYMPTOM")]);
        let html = result.rendered.as_markup().unwrap();
        assert!(html.contains("&lt;5mg&gt;"));
        assert!(html.contains("&amp;"));
    }

    #[test]
    fn entity_markup_characters_are_escaped_inside_wrapper() {
        let result = render("take <Drug> daily", &[entity("<Drug>", "DRUG")]);
        let html = result.rendered.as_markup().unwrap();
        assert!(html.contains(">&lt;Drug&gt;</span>"));
        // No angle brackets from the source leak outside the wrappers.
        let stripped = html
            .replace("<span style=\"background-color: #8aff80; padding: 2px; border-radius: 3px;\" title=\"DRUG\">", "")
            .replace("</span>", "");
        assert!(!stripped.contains('<'));
        assert!(!stripped.contains('>'));
    }

    #[test]
    fn unknown_label_uses_fallback_color() {
        let result = render("mystery term", &[entity("mystery", "WIDGET")]);
        let html = result.rendered.as_markup().unwrap();
        assert!(html.contains("background-color: #cccccc"));
    }

    #[test]
    fn overlapping_entities_render_the_earliest_only() {
        let source = "chronic kidney disease";
        let result = render(
            source,
            &[entity("chronic kidney", "DISEASE"), entity("kidney disease", "DISEASE")],
        );
        assert_eq!(result.diagnostics.spans_located, 2);
        assert_eq!(result.diagnostics.spans_accepted, 1);
        assert_eq!(result.diagnostics.spans_dropped, 1);
        let html = result.rendered.as_markup().unwrap();
        assert!(html.contains(">chronic kidney</span> disease"));
    }

    #[test]
    fn oversize_markup_is_truncated_and_flagged() {
        let source = "aspirin ".repeat(500);
        let result = render_highlights(
            &source,
            &[entity("aspirin", "DRUG")],
            &RenderConfig {
                max_markup_len: 1000,
            },
        );
        let html = result.rendered.as_markup().unwrap();
        assert!(result.diagnostics.truncated);
        assert!(html.ends_with(TRUNCATION_MARKER));
        assert!(html.len() <= 1000 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn all_occurrences_of_an_entity_are_highlighted() {
        let result = render(
            "aspirin, then more aspirin",
            &[entity("aspirin", "DRUG")],
        );
        assert_eq!(result.diagnostics.spans_accepted, 2);
        let html = result.rendered.as_markup().unwrap();
        assert_eq!(html.matches("</span>").count(), 2);
    }
}
