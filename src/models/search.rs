//! Search result wire model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A ranked hit from the semantic search collaborator. Ephemeral; rendered
/// once and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    pub document_id: String,
    pub title: String,
    /// Content snippet around the match.
    pub content: String,
    /// Relevance in [0.0, 1.0].
    pub score: f64,
    #[serde(rename = "s3Uri")]
    pub source_uri: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Metadata keys that may carry the hit's page number, probed in order.
const PAGE_NUMBER_KEYS: &[&str] = &[
    "x-amz-bedrock-kb-document-page-number",
    "pageNumber",
    "page",
];

impl SearchResult {
    /// Page number supplied by the search collaborator, if any. The value
    /// arrives as a number or a numeric string depending on the indexer.
    pub fn page_number(&self) -> Option<u32> {
        for key in PAGE_NUMBER_KEYS {
            match self.metadata.get(*key) {
                Some(serde_json::Value::Number(n)) => {
                    if let Some(page) = n.as_u64() {
                        return u32::try_from(page).ok();
                    }
                }
                Some(serde_json::Value::String(s)) => {
                    if let Ok(page) = s.parse::<u32>() {
                        return Some(page);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Relevance as a rounded percentage for display.
    pub fn score_percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }

    /// Title with the result list's fallback to the document id.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.document_id
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_number_prefers_knowledge_base_key() {
        let result: SearchResult = serde_json::from_str(
            r#"{
                "documentId": "123",
                "metadata": {
                    "x-amz-bedrock-kb-document-page-number": 7,
                    "pageNumber": 2
                }
            }"#,
        )
        .unwrap();
        assert_eq!(result.page_number(), Some(7));
    }

    #[test]
    fn page_number_accepts_numeric_strings() {
        let result: SearchResult = serde_json::from_str(
            r#"{"documentId": "123", "metadata": {"page": "4"}}"#,
        )
        .unwrap();
        assert_eq!(result.page_number(), Some(4));
    }

    #[test]
    fn page_number_absent_when_metadata_has_none() {
        let result = SearchResult::default();
        assert_eq!(result.page_number(), None);
    }

    #[test]
    fn score_renders_as_percentage() {
        let result = SearchResult {
            score: 0.847,
            ..Default::default()
        };
        assert_eq!(result.score_percent(), 85);
    }

    #[test]
    fn display_title_falls_back_to_id() {
        let result = SearchResult {
            document_id: "123".into(),
            ..Default::default()
        };
        assert_eq!(result.display_title(), "123");
    }
}
