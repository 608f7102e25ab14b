use serde::{Deserialize, Serialize};

/// A named entity pulled out of the model reply. `label` is always
/// upper-cased; `text` keeps the casing the model produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRecord {
    pub text: String,
    pub label: String,
}

/// A directed triple connecting two entity strings via a relation phrase.
/// The endpoints are purely textual; they need not appear in the entity set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub entity1: String,
    pub relation: String,
    pub entity2: String,
}

/// Per-parse counters, returned alongside the records instead of being
/// written to ambient debug state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    pub lines_seen: usize,
    pub entity_lines: usize,
    pub relationship_lines: usize,
    pub ignored_lines: usize,
    pub duplicates_collapsed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub entities: Vec<EntityRecord>,
    pub relationships: Vec<RelationshipRecord>,
    pub diagnostics: ParseDiagnostics,
}
