//! Pure span-location, overlap-resolution and markup-rendering core.
//!
//! Everything here is a total function over in-memory strings: no I/O, no
//! shared state, no failure modes beyond returning empty or sentinel values.

pub mod colors;
pub mod render;
pub mod resolve;
pub mod span;

pub use colors::{DEFAULT_COLOR, LegendEntry, entity_color, legend};
pub use render::{
    RenderConfig, RenderDiagnostics, RenderResult, Rendered, render_highlights,
};
pub use resolve::resolve_overlaps;
pub use span::{Match, Span, locate_spans};
