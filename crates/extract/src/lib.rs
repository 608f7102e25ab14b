pub mod cache;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod schema;

pub use cache::ResponseCache;
pub use llm::{GeminiClient, LlmError, RetryPolicy};
pub use parser::{ParseOptions, ResponseParser};
pub use schema::{EntityRecord, ExtractionResult, ParseDiagnostics, RelationshipRecord};

/// Facade over the model client and the reply parser: build the prompt, call
/// the model with a bounded retry, parse the reply into records.
pub struct Extractor {
    client: GeminiClient,
    parser: ResponseParser,
    retry: RetryPolicy,
    cache: Option<ResponseCache>,
}

impl Extractor {
    pub fn new(client: GeminiClient, retry: RetryPolicy) -> Self {
        Self {
            client,
            parser: ResponseParser::new(),
            retry,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn parser(&self) -> &ResponseParser {
        &self.parser
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Extract with explicit options. Empty input short-circuits to an empty
    /// result without touching the model.
    pub async fn extract(
        &self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<ExtractionResult, LlmError> {
        if text.trim().is_empty() {
            return Ok(ExtractionResult::default());
        }

        let prompt = if options.include_relationships {
            prompt::build_extraction_prompt(text)
        } else {
            prompt::build_entity_prompt(text)
        };

        let reply = self.generate(&prompt).await?;
        Ok(self.parser.parse(&reply, options))
    }

    /// Entity-only variant; collapses duplicate (text, label) pairs.
    pub async fn extract_entities(&self, text: &str) -> Result<ExtractionResult, LlmError> {
        self.extract(
            text,
            &ParseOptions {
                include_relationships: false,
                deduplicate: true,
            },
        )
        .await
    }

    /// Combined variant: entities plus relationship triples, duplicates kept.
    pub async fn extract_with_relationships(
        &self,
        text: &str,
    ) -> Result<ExtractionResult, LlmError> {
        self.extract(text, &ParseOptions::default()).await
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(prompt) {
                return Ok(hit);
            }
        }

        let reply = self.client.generate_with_retry(prompt, &self.retry).await?;

        if let Some(cache) = &self.cache {
            cache.set(prompt, reply.clone());
        }
        Ok(reply)
    }
}
