/// A located occurrence of an entity string in the source text. Offsets are
/// byte offsets into the source; `text` is the original-case slice at
/// `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// A `Match` carrying its display label and resolved color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub label: String,
    pub color: &'static str,
}

/// Find every case-insensitive occurrence of `entity` in `source`.
///
/// A naive single-pattern scan: every char boundary is tried as a match
/// start, so overlapping occurrences of a repeated pattern are all found
/// ("AA" in "AAA" matches at both offsets). Entity counts are small and
/// sources are a few thousand characters, so nothing smarter is needed.
pub fn locate_spans(source: &str, entity: &str) -> Vec<Match> {
    let mut matches = Vec::new();
    if entity.is_empty() {
        return matches;
    }

    let needle: Vec<char> = entity.chars().collect();
    for (start, _) in source.char_indices() {
        if let Some(end) = match_at(source, start, &needle) {
            matches.push(Match {
                start,
                end,
                text: source[start..end].to_string(),
            });
        }
    }
    matches
}

fn match_at(source: &str, start: usize, needle: &[char]) -> Option<usize> {
    let mut end = start;
    let mut haystack = source[start..].chars();
    for &expected in needle {
        let found = haystack.next()?;
        if !chars_eq_ignore_case(found, expected) {
            return None;
        }
        end += found.len_utf8();
    }
    Some(end)
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_case_insensitive_occurrences_with_original_casing() {
        let source = "aspirin helps with Aspirin resistance";
        let matches = locate_spans(source, "Aspirin");
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].start, matches[0].end), (0, 7));
        assert_eq!(matches[0].text, "aspirin");
        assert_eq!((matches[1].start, matches[1].end), (19, 26));
        assert_eq!(matches[1].text, "Aspirin");
    }

    #[test]
    fn exact_literal_round_trips() {
        let source = "the BRCA1 gene";
        let matches = locate_spans(source, "BRCA1");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].start, 4);
        assert_eq!(&source[matches[0].start..matches[0].end], "BRCA1");
    }

    #[test]
    fn overlapping_occurrences_are_all_found() {
        let matches = locate_spans("AAA", "AA");
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 1]);
    }

    #[test]
    fn empty_entity_never_matches() {
        assert!(locate_spans("some text", "").is_empty());
    }

    #[test]
    fn empty_source_yields_nothing() {
        assert!(locate_spans("", "aspirin").is_empty());
    }

    #[test]
    fn absent_entity_yields_nothing() {
        assert!(locate_spans("ibuprofen only", "aspirin").is_empty());
    }

    #[test]
    fn multibyte_text_keeps_valid_byte_offsets() {
        let source = "naïve patients took Naïve doses";
        let matches = locate_spans(source, "naïve");
        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert_eq!(&source[m.start..m.end], m.text);
        }
        assert_eq!(matches[1].text, "Naïve");
    }
}
