//! Domain models for the terminology bridge

use bridge_semantic_client::Candidate;
use serde::{Deserialize, Serialize};

/// One human-vetted cross-system code equivalence.
///
/// Identified by the `(source_code, target_code)` pair; rows are immutable
/// after creation (re-ingestion is insert-or-ignore, never an update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CodeMapping {
    pub source_system: String,
    pub source_code: String,
    pub target_system: String,
    pub target_code: String,
    pub equivalence: String,
}

impl CodeMapping {
    pub fn equivalent(
        source_system: impl Into<String>,
        source_code: impl Into<String>,
        target_system: impl Into<String>,
        target_code: impl Into<String>,
    ) -> Self {
        Self {
            source_system: source_system.into(),
            source_code: source_code.into(),
            target_system: target_system.into(),
            target_code: target_code.into(),
            equivalence: "equivalent".to_string(),
        }
    }
}

/// One concept of a NAMASTE source vocabulary.
///
/// Re-ingestion overwrites `display`, `definition` and `category` for an
/// existing `code` — the deliberate opposite of [`CodeMapping`] upserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TerminologyEntry {
    pub code: String,
    pub display: String,
    pub definition: Option<String>,
    pub category: Option<String>,
    pub system: String,
}

/// Transient inbound translation request. Not persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationQuery {
    pub code: Option<String>,
    pub system: Option<String>,
    pub text: Option<String>,
}

/// Transient engine outcome, before serialization to the wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    /// A stored, human-vetted mapping matched. Confidence is 1.0 by
    /// contract, not measurement.
    Deterministic { code: String },
    /// Ranked candidates from the semantic engine, in engine order; index 0
    /// is the best guess. Scores are relayed unmodified.
    Semantic { candidates: Vec<Candidate> },
    /// Nothing matched; `reason` says which leg gave up.
    NotFound { reason: String },
}

/// Uniform wire response for `/translate`, identical in shape for every path
/// through the engine.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResponse {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(rename = "translatedCode", skip_serializing_if = "Option::is_none")]
    pub translated_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_suggestions: Option<Vec<Candidate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<TranslationOutcome> for TranslationResponse {
    fn from(outcome: TranslationOutcome) -> Self {
        match outcome {
            TranslationOutcome::Deterministic { code } => Self {
                result: true,
                method: Some("deterministic"),
                confidence: Some(1.0),
                translated_code: Some(code),
                all_suggestions: None,
                message: None,
            },
            TranslationOutcome::Semantic { candidates } => {
                let top = candidates.first().cloned();
                Self {
                    result: true,
                    method: Some("semantic_ai"),
                    confidence: top.as_ref().map(|c| c.score),
                    translated_code: top.map(|c| c.code),
                    all_suggestions: Some(candidates),
                    message: None,
                }
            }
            TranslationOutcome::NotFound { reason } => Self {
                result: false,
                method: None,
                confidence: None,
                translated_code: None,
                all_suggestions: None,
                message: Some(reason),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_response_has_unit_confidence() {
        let response = TranslationResponse::from(TranslationOutcome::Deterministic {
            code: "5A11".to_string(),
        });
        assert!(response.result);
        assert_eq!(response.method, Some("deterministic"));
        assert_eq!(response.confidence, Some(1.0));
        assert_eq!(response.translated_code.as_deref(), Some("5A11"));
        assert!(response.all_suggestions.is_none());
    }

    #[test]
    fn semantic_response_relays_top_candidate_unmodified() {
        let candidates = vec![
            Candidate {
                code: "1A00".to_string(),
                score: 0.83,
            },
            Candidate {
                code: "1A03".to_string(),
                score: 0.61,
            },
        ];
        let response = TranslationResponse::from(TranslationOutcome::Semantic {
            candidates: candidates.clone(),
        });
        assert!(response.result);
        assert_eq!(response.method, Some("semantic_ai"));
        assert_eq!(response.confidence, Some(0.83));
        assert_eq!(response.translated_code.as_deref(), Some("1A00"));
        assert_eq!(response.all_suggestions, Some(candidates));
    }

    #[test]
    fn not_found_response_carries_message_only() {
        let response = TranslationResponse::from(TranslationOutcome::NotFound {
            reason: "no relevant mappings".to_string(),
        });
        assert!(!response.result);
        assert!(response.method.is_none());
        assert!(response.translated_code.is_none());
        assert_eq!(response.message.as_deref(), Some("no relevant mappings"));
    }

    #[test]
    fn wire_field_names_match_contract() {
        let response = TranslationResponse::from(TranslationOutcome::Deterministic {
            code: "5A11".to_string(),
        });
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("translatedCode").is_some());
        assert!(value.get("translated_code").is_none());
    }
}
