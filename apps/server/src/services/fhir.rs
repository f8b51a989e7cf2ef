//! FHIR resource construction
//!
//! Static builders for the FHIR shapes this service exposes: a CodeSystem
//! over the ingested NAMASTE entries, a ConceptMap over the stored mappings,
//! and an acknowledgment for submitted encounter Bundles. Submission of
//! bundles to a downstream FHIR server is out of scope; the Bundle endpoint
//! validates shape and acknowledges receipt.

use crate::{
    models::{CodeMapping, TerminologyEntry},
    Error, Result,
};
use chrono::Utc;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Canonical id of the published CodeSystem resource.
pub const CODESYSTEM_ID: &str = "namaste-morbidity";

/// Canonical id of the published ConceptMap resource.
pub const CONCEPTMAP_ID: &str = "namaste-icd11";

/// Build the NAMASTE CodeSystem from the ingested entries.
pub fn code_system(entries: &[TerminologyEntry], system_url: &str) -> JsonValue {
    let concepts: Vec<JsonValue> = entries
        .iter()
        .map(|entry| {
            let mut concept = json!({
                "code": entry.code,
                "display": entry.display,
            });
            if let Some(definition) = &entry.definition {
                concept["definition"] = json!(definition);
            }
            if let Some(category) = &entry.category {
                concept["property"] = json!([{
                    "code": "broader-term",
                    "valueString": category,
                }]);
            }
            concept
        })
        .collect();

    json!({
        "resourceType": "CodeSystem",
        "id": CODESYSTEM_ID,
        "url": system_url,
        "status": "active",
        "content": "complete",
        "date": Utc::now().to_rfc3339(),
        "count": concepts.len(),
        "concept": concepts,
    })
}

/// Build the NAMASTE→ICD-11 ConceptMap from the stored mappings, grouped by
/// (source system, target system).
pub fn concept_map(mappings: &[CodeMapping]) -> JsonValue {
    let mut groups: BTreeMap<(String, String), Vec<&CodeMapping>> = BTreeMap::new();
    for mapping in mappings {
        groups
            .entry((mapping.source_system.clone(), mapping.target_system.clone()))
            .or_default()
            .push(mapping);
    }

    let group: Vec<JsonValue> = groups
        .into_iter()
        .map(|((source, target), members)| {
            let elements: Vec<JsonValue> = members
                .iter()
                .map(|m| {
                    json!({
                        "code": m.source_code,
                        "target": [{
                            "code": m.target_code,
                            "equivalence": m.equivalence,
                        }],
                    })
                })
                .collect();
            json!({
                "source": source,
                "target": target,
                "element": elements,
            })
        })
        .collect();

    json!({
        "resourceType": "ConceptMap",
        "id": CONCEPTMAP_ID,
        "status": "active",
        "date": Utc::now().to_rfc3339(),
        "group": group,
    })
}

/// Validate an inbound Bundle and produce an acknowledgment envelope.
pub fn bundle_ack(bundle: &JsonValue) -> Result<JsonValue> {
    let resource_type = bundle
        .get("resourceType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Validation("missing resourceType".to_string()))?;

    if resource_type != "Bundle" {
        return Err(Error::Validation(format!(
            "expected a Bundle, got {resource_type}"
        )));
    }

    let entries = bundle
        .get("entry")
        .and_then(|v| v.as_array())
        .map(|a| a.len())
        .unwrap_or(0);

    if entries == 0 {
        return Err(Error::Validation("Bundle has no entries".to_string()));
    }

    Ok(json!({
        "status": "accepted",
        "bundleType": bundle.get("type").cloned().unwrap_or(JsonValue::Null),
        "entries": entries,
        "receipt": Uuid::new_v4().to_string(),
        "received": Utc::now().to_rfc3339(),
    }))
}
