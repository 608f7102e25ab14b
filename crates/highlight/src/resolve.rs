use crate::span::Span;

/// Select a maximal non-overlapping subset of `spans`, left to right.
///
/// Stable sort by start (ties keep encounter order: entity-list order, then
/// occurrence order), then greedy acceptance: a span is kept iff it starts at
/// or after the previous accepted span's end. The earliest-starting span wins
/// every conflict; an overlapped later span is dropped even when it is the
/// longer or more specific match. That is a deliberate trade-off kept for
/// output stability, not a bug.
pub fn resolve_overlaps(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| s.start);

    let mut accepted = Vec::with_capacity(spans.len());
    let mut last_end = 0usize;
    for span in spans {
        if span.start >= last_end {
            last_end = span.end;
            accepted.push(span);
        }
    }
    accepted
}
