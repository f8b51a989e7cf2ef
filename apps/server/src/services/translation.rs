//! Hybrid translation engine
//!
//! Two-stage resolution of a NAMASTE code (or free text) to ICD-11:
//!
//! 1. **Deterministic** — exact lookup in the human-vetted mapping table.
//!    Applies only when a code is supplied together with a system that
//!    indicates a NAMASTE vocabulary. A hit short-circuits with confidence
//!    1.0 and never touches the semantic engine, even if text was also sent.
//! 2. **Semantic** — similarity search against the external embedding
//!    engine, driven by the supplied free text or, failing that, by the
//!    code's stored definition/display. An unreachable engine surfaces as
//!    [`Error::SemanticEngine`], never as an empty result.
//!
//! The engine is purely functional over its inputs and read-only against
//! both stores; concurrent requests cannot interfere.

use crate::{
    db::traits::{MappingStore, TerminologyStore},
    models::{TranslationOutcome, TranslationQuery},
    Error, Result,
};
use async_trait::async_trait;
use bridge_semantic_client::{Candidate, SemanticClient};

/// Seam over the remote similarity engine, so engine tests can run without a
/// network. [`SemanticClient`] is the production implementation.
#[async_trait]
pub trait SemanticSearch: Send + Sync {
    async fn search(
        &self,
        text: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<Candidate>, bridge_semantic_client::Error>;
}

#[async_trait]
impl SemanticSearch for SemanticClient {
    async fn search(
        &self,
        text: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<Candidate>, bridge_semantic_client::Error> {
        SemanticClient::search(self, text, top_k).await
    }
}

#[async_trait]
impl<'a, S: SemanticSearch + ?Sized> SemanticSearch for &'a S {
    async fn search(
        &self,
        text: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<Candidate>, bridge_semantic_client::Error> {
        (**self).search(text, top_k).await
    }
}

/// The translation engine. Stateless across requests; all collaborators are
/// injected at construction.
pub struct TranslationService<M, T, S> {
    mappings: M,
    terminology: T,
    semantic: S,
    namaste_systems: Vec<String>,
    top_k: usize,
}

impl<M, T, S> TranslationService<M, T, S>
where
    M: MappingStore,
    T: TerminologyStore,
    S: SemanticSearch,
{
    pub fn new(
        mappings: M,
        terminology: T,
        semantic: S,
        namaste_systems: Vec<String>,
        top_k: usize,
    ) -> Self {
        Self {
            mappings,
            terminology,
            semantic,
            namaste_systems,
            top_k,
        }
    }

    /// Resolve one translation request through the two-stage pipeline.
    pub async fn translate(&self, query: &TranslationQuery) -> Result<TranslationOutcome> {
        let code = query.code.as_deref().filter(|c| !c.trim().is_empty());
        let text = query.text.as_deref().filter(|t| !t.trim().is_empty());

        if code.is_none() && text.is_none() {
            return Err(Error::MissingParameters);
        }

        // Stage 1: deterministic lookup. Hard precedence over the semantic
        // stage whenever a code arrives under a NAMASTE system.
        if let Some(code) = code {
            if self.is_namaste_system(query.system.as_deref()) {
                if let Some(mapping) = self.mappings.lookup(code).await? {
                    tracing::debug!(code, target = %mapping.target_code, "Deterministic hit");
                    return Ok(TranslationOutcome::Deterministic {
                        code: mapping.target_code,
                    });
                }
                tracing::debug!(code, "No stored mapping, falling back to semantic stage");
            }
        }

        // Stage 2: semantic resolve.
        let query_text = match text {
            Some(t) => Some(t.to_string()),
            None => match code {
                Some(c) => self.resolve_definition(c).await?,
                None => None,
            },
        };

        let Some(query_text) = query_text else {
            return Ok(TranslationOutcome::NotFound {
                reason: "no deterministic mapping and no text available".to_string(),
            });
        };

        let candidates = self
            .semantic
            .search(&query_text, self.top_k)
            .await
            .map_err(Error::SemanticEngine)?;

        if candidates.is_empty() {
            return Ok(TranslationOutcome::NotFound {
                reason: "no relevant mappings".to_string(),
            });
        }

        // Candidates stay in engine order; index 0 is the best guess.
        Ok(TranslationOutcome::Semantic { candidates })
    }

    /// Definition resolver: text suitable for semantic search, derived from
    /// a code's terminology entry. Prefers the long-form definition, falls
    /// back to the display term, `None` when the entry does not exist.
    pub async fn resolve_definition(&self, code: &str) -> Result<Option<String>> {
        let Some(entry) = self.terminology.get_by_code(code).await? else {
            return Ok(None);
        };

        Ok(Some(
            entry
                .definition
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(entry.display),
        ))
    }

    /// Whether the supplied system URI selects the deterministic stage.
    ///
    /// Exact match against the configured NAMASTE system URIs, with a
    /// case-insensitive "namaste" substring as a lenient fallback for
    /// shorthand identifiers clients send in practice.
    fn is_namaste_system(&self, system: Option<&str>) -> bool {
        match system {
            Some(s) => {
                self.namaste_systems.iter().any(|known| known == s)
                    || s.to_ascii_lowercase().contains("namaste")
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodeMapping, TerminologyEntry};
    use std::collections::HashMap;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    const AYURVEDA: &str = "https://ayush.gov.in/fhir/CodeSystem/namaste-ayurveda";

    struct FakeMappings {
        rows: HashMap<String, CodeMapping>,
    }

    impl FakeMappings {
        fn empty() -> Self {
            Self {
                rows: HashMap::new(),
            }
        }

        fn with(mapping: CodeMapping) -> Self {
            let mut rows = HashMap::new();
            rows.insert(mapping.source_code.clone(), mapping);
            Self { rows }
        }
    }

    #[async_trait]
    impl MappingStore for FakeMappings {
        async fn lookup(&self, source_code: &str) -> Result<Option<CodeMapping>> {
            Ok(self.rows.get(source_code).cloned())
        }

        async fn upsert(&self, _mapping: &CodeMapping) -> Result<()> {
            unreachable!("engine must never write to the mapping store")
        }

        async fn upsert_batch(&self, _mappings: &[CodeMapping]) -> Result<u64> {
            unreachable!("engine must never write to the mapping store")
        }

        async fn list_all(&self) -> Result<Vec<CodeMapping>> {
            Ok(self.rows.values().cloned().collect())
        }
    }

    struct FakeTerminology {
        rows: HashMap<String, TerminologyEntry>,
    }

    impl FakeTerminology {
        fn empty() -> Self {
            Self {
                rows: HashMap::new(),
            }
        }

        fn with(entry: TerminologyEntry) -> Self {
            let mut rows = HashMap::new();
            rows.insert(entry.code.clone(), entry);
            Self { rows }
        }
    }

    #[async_trait]
    impl TerminologyStore for FakeTerminology {
        async fn get_by_code(&self, code: &str) -> Result<Option<TerminologyEntry>> {
            Ok(self.rows.get(code).cloned())
        }

        async fn search_display(&self, _term: &str, _limit: i64) -> Result<Vec<TerminologyEntry>> {
            Ok(vec![])
        }

        async fn list_all(&self) -> Result<Vec<TerminologyEntry>> {
            Ok(vec![])
        }

        async fn upsert_batch(&self, _entries: &[TerminologyEntry]) -> Result<u64> {
            unreachable!("engine must never write to the terminology store")
        }
    }

    /// Scripted semantic engine that records the queries it receives.
    struct FakeSemantic {
        response: std::result::Result<Vec<Candidate>, ()>,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl FakeSemantic {
        fn returning(candidates: Vec<Candidate>) -> Self {
            Self {
                response: Ok(candidates),
                calls: AtomicUsize::new(0),
                queries: Mutex::new(vec![]),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(()),
                calls: AtomicUsize::new(0),
                queries: Mutex::new(vec![]),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn recorded_queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SemanticSearch for FakeSemantic {
        async fn search(
            &self,
            text: &str,
            _top_k: usize,
        ) -> std::result::Result<Vec<Candidate>, bridge_semantic_client::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(text.to_string());
            match &self.response {
                Ok(candidates) => Ok(candidates.clone()),
                Err(()) => Err(bridge_semantic_client::Error::Status {
                    status: 503,
                    body: "engine down".to_string(),
                }),
            }
        }
    }

    fn engine<'a>(
        mappings: FakeMappings,
        terminology: FakeTerminology,
        semantic: &'a FakeSemantic,
    ) -> TranslationService<FakeMappings, FakeTerminology, &'a FakeSemantic> {
        TranslationService::new(mappings, terminology, semantic, vec![AYURVEDA.to_string()], 3)
    }

    fn candidate(code: &str, score: f64) -> Candidate {
        Candidate {
            code: code.to_string(),
            score,
        }
    }

    #[tokio::test]
    async fn missing_both_code_and_text_is_rejected() {
        let semantic = FakeSemantic::returning(vec![]);
        let service = engine(FakeMappings::empty(), FakeTerminology::empty(), &semantic);

        let err = service
            .translate(&TranslationQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingParameters));
        assert_eq!(semantic.call_count(), 0);
    }

    #[tokio::test]
    async fn deterministic_hit_wins_even_when_text_is_supplied() {
        let mapping = CodeMapping::equivalent(AYURVEDA, "AAA-1", crate::config::ICD11_SYSTEM, "SR11");
        let semantic = FakeSemantic::returning(vec![candidate("1A00", 0.9)]);
        let service = engine(FakeMappings::with(mapping), FakeTerminology::empty(), &semantic);

        let outcome = service
            .translate(&TranslationQuery {
                code: Some("AAA-1".to_string()),
                system: Some(AYURVEDA.to_string()),
                text: Some("watery diarrhoea".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TranslationOutcome::Deterministic {
                code: "SR11".to_string()
            }
        );
        // Hard precedence: the semantic engine is never consulted on a hit.
        assert_eq!(semantic.call_count(), 0);
    }

    #[tokio::test]
    async fn mapping_miss_falls_back_to_semantic_with_exact_text() {
        let semantic = FakeSemantic::returning(vec![
            candidate("1A00", 0.83),
            candidate("1A03", 0.61),
        ]);
        let service = engine(FakeMappings::empty(), FakeTerminology::empty(), &semantic);

        let outcome = service
            .translate(&TranslationQuery {
                code: Some("AAA-9".to_string()),
                system: Some(AYURVEDA.to_string()),
                text: Some("chronic watery diarrhoea".to_string()),
            })
            .await
            .unwrap();

        match outcome {
            TranslationOutcome::Semantic { candidates } => {
                assert_eq!(candidates[0], candidate("1A00", 0.83));
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected semantic outcome, got {other:?}"),
        }
        assert_eq!(
            semantic.recorded_queries(),
            vec!["chronic watery diarrhoea".to_string()]
        );
    }

    #[tokio::test]
    async fn non_namaste_system_skips_deterministic_stage() {
        // A stored mapping exists, but the system does not indicate NAMASTE,
        // so the engine goes straight to the semantic stage.
        let mapping = CodeMapping::equivalent(AYURVEDA, "AAA-1", crate::config::ICD11_SYSTEM, "SR11");
        let semantic = FakeSemantic::returning(vec![candidate("1A00", 0.7)]);
        let service = engine(FakeMappings::with(mapping), FakeTerminology::empty(), &semantic);

        let outcome = service
            .translate(&TranslationQuery {
                code: Some("AAA-1".to_string()),
                system: Some("http://example.org/other-system".to_string()),
                text: Some("some text".to_string()),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, TranslationOutcome::Semantic { .. }));
        assert_eq!(semantic.call_count(), 1);
    }

    #[tokio::test]
    async fn definition_drives_fallback_when_no_text_given() {
        let entry = TerminologyEntry {
            code: "AAA-9".to_string(),
            display: "Atisara".to_string(),
            definition: Some("Frequent loose watery stools".to_string()),
            category: None,
            system: AYURVEDA.to_string(),
        };
        let semantic = FakeSemantic::returning(vec![candidate("1A40", 0.77)]);
        let service = engine(FakeMappings::empty(), FakeTerminology::with(entry), &semantic);

        let outcome = service
            .translate(&TranslationQuery {
                code: Some("AAA-9".to_string()),
                system: Some(AYURVEDA.to_string()),
                text: None,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, TranslationOutcome::Semantic { .. }));
        assert_eq!(
            semantic.recorded_queries(),
            vec!["Frequent loose watery stools".to_string()]
        );
    }

    #[tokio::test]
    async fn display_is_used_when_definition_missing() {
        let entry = TerminologyEntry {
            code: "AAA-9".to_string(),
            display: "Atisara".to_string(),
            definition: None,
            category: None,
            system: AYURVEDA.to_string(),
        };
        let semantic = FakeSemantic::returning(vec![candidate("1A40", 0.5)]);
        let service = engine(FakeMappings::empty(), FakeTerminology::with(entry), &semantic);

        service
            .translate(&TranslationQuery {
                code: Some("AAA-9".to_string()),
                system: Some(AYURVEDA.to_string()),
                text: None,
            })
            .await
            .unwrap();

        assert_eq!(semantic.recorded_queries(), vec!["Atisara".to_string()]);
    }

    #[tokio::test]
    async fn unknown_code_without_text_is_not_found_without_calling_engine() {
        let semantic = FakeSemantic::returning(vec![candidate("1A00", 0.9)]);
        let service = engine(FakeMappings::empty(), FakeTerminology::empty(), &semantic);

        let outcome = service
            .translate(&TranslationQuery {
                code: Some("ZZZ-404".to_string()),
                system: Some(AYURVEDA.to_string()),
                text: None,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TranslationOutcome::NotFound {
                reason: "no deterministic mapping and no text available".to_string()
            }
        );
        assert_eq!(semantic.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_candidate_set_is_not_found() {
        let semantic = FakeSemantic::returning(vec![]);
        let service = engine(FakeMappings::empty(), FakeTerminology::empty(), &semantic);

        let outcome = service
            .translate(&TranslationQuery {
                text: Some("extremely obscure phrase".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TranslationOutcome::NotFound {
                reason: "no relevant mappings".to_string()
            }
        );
    }

    #[tokio::test]
    async fn engine_failure_surfaces_as_semantic_error_not_not_found() {
        let semantic = FakeSemantic::failing();
        let service = engine(FakeMappings::empty(), FakeTerminology::empty(), &semantic);

        let err = service
            .translate(&TranslationQuery {
                text: Some("fever with chills".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SemanticEngine(_)));
    }

    #[tokio::test]
    async fn free_text_only_goes_straight_to_semantic_stage() {
        let semantic = FakeSemantic::returning(vec![candidate("CA23", 0.66)]);
        let service = engine(FakeMappings::empty(), FakeTerminology::empty(), &semantic);

        let outcome = service
            .translate(&TranslationQuery {
                text: Some("persistent cough".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches!(outcome, TranslationOutcome::Semantic { .. }));
        assert_eq!(semantic.call_count(), 1);
    }

    #[tokio::test]
    async fn shorthand_namaste_system_selects_deterministic_stage() {
        let mapping = CodeMapping::equivalent(AYURVEDA, "BB", crate::config::ICD11_SYSTEM, "5A11");
        let semantic = FakeSemantic::returning(vec![]);
        let service = engine(FakeMappings::with(mapping), FakeTerminology::empty(), &semantic);

        let outcome = service
            .translate(&TranslationQuery {
                code: Some("BB".to_string()),
                system: Some("namaste-siddha".to_string()),
                text: None,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TranslationOutcome::Deterministic {
                code: "5A11".to_string()
            }
        );
    }
}
