//! Wire types for the ingredient backend.
//!
//! Field names follow the backend's JSON contract exactly; anything the
//! backend may omit carries a serde default so a sparse response still
//! deserializes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker the backend embeds in a verdict string when an ingredient passes.
pub const COMPLIANT_MARKER: &str = "✅";

/// One ranked ingredient record from the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// Stable identifier, unique within a result set. Keys expansion state.
    pub source_id: String,

    /// Full INCI name.
    #[serde(rename = "incinamefull")]
    pub inci_name: String,

    #[serde(default)]
    pub functions: Vec<String>,

    #[serde(rename = "textScore", default)]
    pub text_score: f64,

    #[serde(rename = "vectorScore", default)]
    pub vector_score: f64,

    #[serde(rename = "combinedScore", default)]
    pub combined_score: f64,
}

/// Body of the search endpoint's response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
}

/// Body of the health endpoint's response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub ok: bool,
}

/// Request body for the validate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateRequest {
    pub name: String,
    pub ingredients: BTreeMap<String, String>,
}

/// Per-ingredient verdict from the validate endpoint.
///
/// `status` is a human-readable string; whether it contains
/// [`COMPLIANT_MARKER`] decides pass/fail for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientVerdict {
    pub ingredient: String,
    pub concentration: String,
    pub status: String,
}

impl IngredientVerdict {
    pub fn is_compliant(&self) -> bool {
        self.status.contains(COMPLIANT_MARKER)
    }
}

/// Body of the validate endpoint's response.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResponse {
    #[serde(default)]
    pub results: Vec<IngredientVerdict>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub pdf_url: Option<String>,
}

/// Structured outcome a completed validation commits into its session.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub per_ingredient: Vec<IngredientVerdict>,
    /// Long-form narrative (markdown-bearing), rendered verbatim.
    pub narrative_summary: Option<String>,
    /// Report reference, resolved against the backend base address at render time.
    pub report_ref: Option<String>,
}

impl From<ValidateResponse> for ValidationOutcome {
    fn from(response: ValidateResponse) -> Self {
        Self {
            per_ingredient: response.results,
            narrative_summary: response.summary,
            report_ref: response.pdf_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_item_full_record() {
        let json = r#"{
            "source_id": "1",
            "incinamefull": "Water",
            "functions": ["solvent"],
            "textScore": 0.9,
            "vectorScore": 0.8,
            "combinedScore": 0.85
        }"#;
        let item: SearchResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.source_id, "1");
        assert_eq!(item.inci_name, "Water");
        assert_eq!(item.functions, vec!["solvent"]);
        assert_eq!(item.combined_score, 0.85);
    }

    #[test]
    fn test_search_item_sparse_record_defaults() {
        let json = r#"{"source_id": "7", "incinamefull": "Glycerin"}"#;
        let item: SearchResultItem = serde_json::from_str(json).unwrap();
        assert!(item.functions.is_empty());
        assert_eq!(item.text_score, 0.0);
        assert_eq!(item.vector_score, 0.0);
        assert_eq!(item.combined_score, 0.0);
    }

    #[test]
    fn test_search_response_missing_results() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_verdict_marker_classification() {
        let pass = IngredientVerdict {
            ingredient: "Aqua".to_string(),
            concentration: "40%".to_string(),
            status: "✅ Compliant".to_string(),
        };
        assert!(pass.is_compliant());

        let fail = IngredientVerdict {
            ingredient: "Hydroquinone".to_string(),
            concentration: "2%".to_string(),
            status: "⚠️ Restricted above 1%".to_string(),
        };
        assert!(!fail.is_compliant());
    }

    #[test]
    fn test_validate_response_optional_fields_absent() {
        let json = r#"{"results": [{"ingredient": "Aqua", "concentration": "40%", "status": "✅ Compliant"}]}"#;
        let response: ValidateResponse = serde_json::from_str(json).unwrap();
        let outcome = ValidationOutcome::from(response);
        assert_eq!(outcome.per_ingredient.len(), 1);
        assert!(outcome.narrative_summary.is_none());
        assert!(outcome.report_ref.is_none());
    }

    #[test]
    fn test_validate_request_wire_shape() {
        let mut ingredients = BTreeMap::new();
        ingredients.insert("Aqua".to_string(), "40%".to_string());
        let request = ValidateRequest {
            name: "Cream".to_string(),
            ingredients,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["name"], "Cream");
        assert_eq!(body["ingredients"]["Aqua"], "40%");
    }
}
