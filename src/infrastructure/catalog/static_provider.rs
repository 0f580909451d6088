//! Built-in catalog used when no evaluation backend is configured

use async_trait::async_trait;

use crate::domain::catalog::{Catalog, CatalogOption, CatalogProvider, MetricGroups, MetricOption};
use crate::domain::DomainError;

/// Options sorted by label, the order the backend serves them in
fn options(pairs: &[(&str, &str)]) -> Vec<CatalogOption> {
    let mut options: Vec<_> = pairs
        .iter()
        .map(|(id, label)| CatalogOption::new(*id, *label))
        .collect();
    options.sort_by_key(|option| option.label.to_lowercase());
    options
}

fn metrics(entries: &[(&str, &str, &str)]) -> Vec<MetricOption> {
    entries
        .iter()
        .map(|(id, label, description)| MetricOption::new(*id, *label, *description))
        .collect()
}

pub fn builtin_catalog() -> Catalog {
    Catalog {
        agent_types: options(&[
            ("rag_agent", "RAG Agent"),
            ("react_agent", "ReAct Agent"),
            ("corrective_rag_agent", "Corrective RAG Agent"),
        ]),
        chunking_strategies: options(&[
            ("fixed_size", "Fixed Size"),
            ("recursive", "Recursive Character"),
            ("semantic", "Semantic"),
        ]),
        embedding_models: options(&[
            ("amazon.titan-embed-text-v2:0", "Titan Text Embeddings V2"),
            ("cohere.embed-multilingual-v3", "Cohere Embed Multilingual"),
            ("text-embedding-3-small", "OpenAI Embedding 3 Small"),
        ]),
        llm_interfaces: options(&[("bedrock", "AWS Bedrock"), ("openai", "OpenAI")]),
        retriever_types: options(&[
            ("dense", "Dense Vector"),
            ("hybrid", "Hybrid (Dense + BM25)"),
            ("bm25", "BM25 Keyword"),
        ]),
        evaluation_metrics_grouped: MetricGroups {
            retrieval: metrics(&[
                ("context_precision", "Context Precision", "Share of retrieved chunks that are relevant"),
                ("context_recall", "Context Recall", "Share of relevant chunks that were retrieved"),
            ]),
            agent: metrics(&[
                ("tool_call_accuracy", "Tool Call Accuracy", "Whether the agent picked the right tools"),
                ("goal_accuracy", "Goal Accuracy", "Whether the agent reached the user's goal"),
            ]),
            generation: metrics(&[
                ("faithfulness", "Faithfulness", "Answer claims supported by the retrieved context"),
                ("answer_relevancy", "Answer Relevancy", "How well the answer addresses the question"),
                ("answer_correctness", "Answer Correctness", "Agreement with the reference answer"),
            ]),
            aggregate: metrics(&[
                ("latency", "Latency", "Wall-clock seconds per query"),
                ("token_usage", "Token Usage", "Prompt and completion tokens per query"),
            ]),
        },
        llm_models: options(&[
            ("anthropic.claude-3-5-sonnet-20240620-v1:0", "Claude 3.5 Sonnet"),
            ("anthropic.claude-3-haiku-20240307-v1:0", "Claude 3 Haiku"),
            ("gpt-4o-mini", "GPT-4o mini"),
        ]),
    }
}

/// Serves a fixed catalog
#[derive(Debug, Clone)]
pub struct StaticCatalogProvider {
    catalog: Catalog,
}

impl StaticCatalogProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl Default for StaticCatalogProvider {
    fn default() -> Self {
        Self::new(builtin_catalog())
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalogProvider {
    async fn catalog(&self) -> Result<Catalog, DomainError> {
        Ok(self.catalog.clone())
    }
}
