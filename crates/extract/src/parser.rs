use regex::Regex;
use std::collections::HashSet;

use crate::schema::{EntityRecord, ExtractionResult, RelationshipRecord};

/// Per-call knobs for the consolidated parser. The entity-only flow runs with
/// `include_relationships: false, deduplicate: true`; the combined flow keeps
/// duplicates and also collects relationship triples.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub include_relationships: bool,
    pub deduplicate: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_relationships: true,
            deduplicate: false,
        }
    }
}

/// Line-oriented parser for the model's semi-structured reply.
///
/// Well-formed lines look like `Aspirin - [DRUG]` or
/// `Relationship: Aspirin -[treats]-> Headache` (the `Relationship:` marker
/// is optional). Anything else is silently dropped; malformed input never
/// fails, worst case the result is empty.
pub struct ResponseParser {
    entity: Regex,
    relation: Regex,
    relation_bare: Regex,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            // Anchored to the whole line so a relationship arrow `-[x]->`
            // is never mistaken for an entity tag.
            entity: Regex::new(r"^(.*?)\s*-\s*\[(.*?)\]\s*$").unwrap(),
            relation: Regex::new(r"^Relationship:\s*(.*?)\s*-\[(.*?)\]->\s*(.*)$").unwrap(),
            relation_bare: Regex::new(r"^(.*?)\s*-\[(.*?)\]->\s*(.*)$").unwrap(),
        }
    }

    /// Entity lines only, duplicates kept, input order preserved.
    pub fn parse_entities(&self, raw: &str) -> Vec<EntityRecord> {
        self.parse(
            raw,
            &ParseOptions {
                include_relationships: false,
                deduplicate: false,
            },
        )
        .entities
    }

    /// Relationship triples only, input order preserved.
    pub fn parse_relationships(&self, raw: &str) -> Vec<RelationshipRecord> {
        self.parse(raw, &ParseOptions::default()).relationships
    }

    /// Parse a full reply according to `options`. Each non-blank line is
    /// tried against the entity grammar first; only on failure are the
    /// relationship grammars attempted. Lines matching neither are counted
    /// and dropped.
    pub fn parse(&self, raw: &str, options: &ParseOptions) -> ExtractionResult {
        let mut result = ExtractionResult::default();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            result.diagnostics.lines_seen += 1;

            if let Some(caps) = self.entity.captures(line) {
                let text = caps[1].trim();
                let label = caps[2].trim().to_uppercase();
                if text.is_empty() || label.is_empty() {
                    // Consumed by the entity grammar; never retried as a
                    // relationship.
                    result.diagnostics.ignored_lines += 1;
                    continue;
                }
                let record = EntityRecord {
                    text: text.to_string(),
                    label,
                };
                if options.deduplicate
                    && !seen.insert((record.text.clone(), record.label.clone()))
                {
                    result.diagnostics.duplicates_collapsed += 1;
                } else {
                    result.diagnostics.entity_lines += 1;
                    result.entities.push(record);
                }
                continue;
            }

            if options.include_relationships {
                let caps = self
                    .relation
                    .captures(line)
                    .or_else(|| self.relation_bare.captures(line));
                if let Some(caps) = caps {
                    let entity1 = caps[1].trim();
                    let relation = caps[2].trim();
                    let entity2 = caps[3].trim();
                    if !entity1.is_empty() && !relation.is_empty() && !entity2.is_empty() {
                        result.diagnostics.relationship_lines += 1;
                        result.relationships.push(RelationshipRecord {
                            entity1: entity1.to_string(),
                            relation: relation.to_string(),
                            entity2: entity2.to_string(),
                        });
                        continue;
                    }
                }
            }

            result.diagnostics.ignored_lines += 1;
        }

        result
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}
