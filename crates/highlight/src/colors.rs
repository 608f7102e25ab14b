use serde::Serialize;
use std::collections::BTreeSet;

use extract::schema::EntityRecord;

/// Fallback swatch for labels outside the fixed table.
pub const DEFAULT_COLOR: &str = "#cccccc";

/// Fixed label -> hex color table for the highlight wrappers and the legend.
pub fn entity_color(label: &str) -> &'static str {
    match label {
        "DISEASE" => "#ff9966",
        "DRUG" | "DRUG_CLASS" => "#8aff80",
        "DOSAGE" => "#ff6b6b",
        "FORM" => "#f0e68c",
        "FREQUENCY" => "#ffa500",
        "DURATION" => "#ffff00",
        "ROUTE" => "#add8e6",
        "REASON" | "HORMONE" => "#98fb98",
        "SYMPTOM" => "#d8bfd8",
        "ORGAN" => "#afeeee",
        "PROTEIN" => "#87cefa",
        "GENE" => "#dda0dd",
        "CHEMICAL" => "#b0c4de",
        "ORGANIZATION" => "#f5deb3",
        "LOCATION" => "#d3d3d3",
        "VIRUS" => "#ffcccb",
        _ => DEFAULT_COLOR,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

/// One entry per distinct label in the input entity list (not just the
/// labels that survived overlap resolution), alphabetical.
pub fn legend(entities: &[EntityRecord]) -> Vec<LegendEntry> {
    let labels: BTreeSet<&str> = entities.iter().map(|e| e.label.as_str()).collect();
    labels
        .into_iter()
        .map(|label| LegendEntry {
            label: label.to_string(),
            color: entity_color(label),
        })
        .collect()
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

    #[test]
    fn known_labels_have_fixed_colors() {
        assert_eq!(entity_color("DISEASE"), "#ff9966");
        assert_eq!(entity_color("DRUG"), "#8aff80");
        assert_eq!(entity_color("DRUG_CLASS"), "#8aff80");
        assert_eq!(entity_color("VIRUS"), "#ffcccb");
    }

    #[test]
    fn unknown_labels_fall_back_to_gray() {
        assert_eq!(entity_color("NANOBOT"), DEFAULT_COLOR);
        assert_eq!(entity_color(""), DEFAULT_COLOR);
    }

    #[test]
    fn legend_is_distinct_and_alphabetical() {
        let entities = vec![
            entity("aspirin", "DRUG"),
            entity("headache", "SYMPTOM"),
            entity("ibuprofen", "DRUG"),
            entity("TP53", "GENE"),
        ];
        let entries = legend(&entities);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["DRUG", "GENE", "SYMPTOM"]);
    }

    #[test]
    fn legend_of_empty_list_is_empty() {
        assert!(legend(&[]).is_empty());
    }
}
