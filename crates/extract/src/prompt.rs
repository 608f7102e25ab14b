/// Longest slice of the source document embedded into a prompt. Anything
/// beyond this is dropped; the model only ever sees the head of the text.
pub const MAX_PROMPT_TEXT_CHARS: usize = 4000;

/// Clip `text` to at most `MAX_PROMPT_TEXT_CHARS` characters, on a char
/// boundary.
pub fn clip_for_prompt(text: &str) -> &str {
    match text.char_indices().nth(MAX_PROMPT_TEXT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Prompt for the entity-only flow.
pub fn build_entity_prompt(text: &str) -> String {
    format!(
        r#"Extract named entities from the following biomedical text.
Provide the output in the following format exactly:
Entity - [Label]
Text: {}
Rules:
1. Identify entities such as diseases, chemicals, genes, proteins, drugs, dosages, frequency, duration, form, viruses, and hormones.
2. Assign appropriate labels (e.g., DISEASE, CHEMICAL, GENE, PROTEIN, DRUG, DRUG_CLASS, DOSAGE, FREQUENCY, DURATION, FORM, VIRUS, HORMONE).
3. Be concise and specific.
4. For drug classes, use DRUG_CLASS label.
5. Make sure every entity in the text is identified.
"#,
        clip_for_prompt(text)
    )
}

/// Prompt for the combined entity + relationship flow.
pub fn build_extraction_prompt(text: &str) -> String {
    format!(
        r#"Extract named entities and their relationships from the following biomedical text.
Provide the output in the following format exactly:

Entity - [Label]
Relationship: Entity1 -[relationship]-> Entity2

Text: {}

Rules:
1. Identify entities such as diseases, chemicals, genes, proteins, drugs, dosages, frequency, duration, form, viruses, and hormones.
2. Assign appropriate labels (e.g., DISEASE, CHEMICAL, GENE, PROTEIN, DRUG, DRUG_CLASS, DOSAGE, FREQUENCY, DURATION, FORM, VIRUS, HORMONE).
3. Identify meaningful relationships between entities (e.g., "treats", "causes", "regulates").
4. Be concise and specific.
5. For drug classes, use DRUG_CLASS label.
6. Make sure every entity in the text is identified.
"#,
        clip_for_prompt(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_kept_whole() {
        assert_eq!(clip_for_prompt("aspirin"), "aspirin");
    }

    #[test]
    fn long_text_is_clipped_to_the_char_budget() {
        let long = "a".repeat(MAX_PROMPT_TEXT_CHARS + 500);
        assert_eq!(clip_for_prompt(&long).chars().count(), MAX_PROMPT_TEXT_CHARS);
    }

    #[test]
    fn clip_respects_char_boundaries() {
        let long = "é".repeat(MAX_PROMPT_TEXT_CHARS + 1);
        let clipped = clip_for_prompt(&long);
        assert_eq!(clipped.chars().count(), MAX_PROMPT_TEXT_CHARS);
        assert!(long.is_char_boundary(clipped.len()));
    }

    #[test]
    fn prompts_embed_the_source_text() {
        let prompt = build_extraction_prompt("Aspirin treats headaches.");
        assert!(prompt.contains("Aspirin treats headaches."));
        assert!(prompt.contains("Relationship: Entity1 -[relationship]-> Entity2"));
    }
}
