//! Analysis result schema and response validation.
//!
//! The model is instructed to reply with raw JSON matching a fixed nested
//! layout. This module declares that layout and coerces the model's text into
//! it. Field names carry display-oriented aliases ("Recommended Fix") distinct
//! from their programmatic forms (`Recommended_Fix`); both are accepted on
//! input, and serialization always emits the display form. Optional objects
//! default to null, sequences default to empty, and unrecognized keys are
//! ignored.

use serde::{Deserialize, Serialize};

/// One issue entry inside the content/styling discrepancy reports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentFinding {
    #[serde(rename = "Section", default)]
    pub section: Option<String>,
    #[serde(rename = "Issue", default)]
    pub issue: Option<String>,
    #[serde(rename = "Details", default)]
    pub details: Option<String>,
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Recommended Fix", alias = "Recommended_Fix", default)]
    pub recommended_fix: Option<String>,
}

/// One issue entry inside the intentional-flaws report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntentionalFinding {
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Issue", default)]
    pub issue: Option<String>,
    #[serde(rename = "Details", default)]
    pub details: Option<String>,
    #[serde(rename = "Recommended Fix", alias = "Recommended_Fix", default)]
    pub recommended_fix: Option<String>,
}

/// One issue entry inside the functional discrepancy report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionalFinding {
    #[serde(rename = "Issue", default)]
    pub issue: Option<String>,
    #[serde(rename = "Details", default)]
    pub details: Option<String>,
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Recommended Fix", alias = "Recommended_Fix", default)]
    pub recommended_fix: Option<String>,
}

/// Miscellaneous issue outside the main report categories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OtherIssue {
    #[serde(rename = "Issue", default)]
    pub issue: Option<String>,
    #[serde(rename = "Details", default)]
    pub details: Option<String>,
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Recommended Fix", alias = "Recommended_Fix", default)]
    pub recommended_fix: Option<String>,
}

/// Shared "summary plus ordered findings" shape.
///
/// Several sub-reports are structurally identical except for the finding
/// payload, so the shape is declared once and parameterized by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report<F> {
    #[serde(rename = "Summary", default)]
    pub summary: Option<String>,
    #[serde(rename = "Findings", default = "Vec::new")]
    pub findings: Vec<F>,
}

impl<F> Default for Report<F> {
    fn default() -> Self {
        Self {
            summary: None,
            findings: Vec::new(),
        }
    }
}

/// In-depth breakdown of issues, one sub-report per category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    #[serde(
        rename = "Content Discrepancies",
        alias = "Content_Discrepancies",
        default
    )]
    pub content_discrepancies: Option<Report<ContentFinding>>,
    #[serde(
        rename = "Styling Discrepancies",
        alias = "Styling_Discrepancies",
        default
    )]
    pub styling_discrepancies: Option<Report<ContentFinding>>,
    #[serde(
        rename = "Intentional Flaws And Known Issues",
        alias = "Intentional_Flaws_And_Known_Issues",
        default
    )]
    pub intentional_flaws_and_known_issues: Option<Report<IntentionalFinding>>,
    #[serde(
        rename = "Functional Discrepancies",
        alias = "Functional_Discrepancies",
        default
    )]
    pub functional_discrepancies: Option<Report<FunctionalFinding>>,
}

/// One issue/fix pair inside a non-LLM audit report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyFinding {
    #[serde(rename = "Issue", default)]
    pub issue: Option<String>,
    #[serde(rename = "Recommended Fix", alias = "Recommended_Fix", default)]
    pub recommended_fix: Option<String>,
}

/// Summary plus key findings, shared by the accessibility, performance and
/// validation audit reports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditReport {
    #[serde(rename = "Summary", default)]
    pub summary: Option<String>,
    #[serde(rename = "Key Findings", alias = "Key_Findings", default = "Vec::new")]
    pub key_findings: Vec<KeyFinding>,
}

/// Layout/overflow audit report: a single summary and fix, no finding list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutReport {
    #[serde(rename = "Summary", default)]
    pub summary: Option<String>,
    #[serde(rename = "Recommended Fix", alias = "Recommended_Fix", default)]
    pub recommended_fix: Option<String>,
}

/// Evaluations performed by third-party tools (axe-core, PageSpeed, Nu
/// validator, overflow probe), passed through the prompt rather than computed
/// here. Present in the response only when the caller supplied audit results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NonLlmEvaluations {
    #[serde(
        rename = "Accessibility Report",
        alias = "Accessibility_Report",
        default
    )]
    pub accessibility_report: Option<AuditReport>,
    #[serde(rename = "Performance Report", alias = "Performance_Report", default)]
    pub performance_report: Option<AuditReport>,
    #[serde(rename = "Validation Report", alias = "Validation_Report", default)]
    pub validation_report: Option<AuditReport>,
    #[serde(rename = "Layout Report", alias = "Layout_Report", default)]
    pub layout_report: Option<LayoutReport>,
}

/// Root result schema for one webpage analysis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(rename = "Executive Summary", alias = "Executive_Summary", default)]
    pub executive_summary: Option<String>,
    #[serde(rename = "Detailed Analysis", alias = "Detailed_Analysis", default)]
    pub detailed_analysis: Option<DetailedAnalysis>,
    #[serde(rename = "Non-LLM Evaluations", alias = "Non_LLM_Evaluations", default)]
    pub non_llm_evaluations: Option<NonLlmEvaluations>,
    #[serde(rename = "Other Issues", alias = "Other_Issues", default = "Vec::new")]
    pub other_issues: Vec<OtherIssue>,
}

/// Parse the model's raw reply into the fixed schema.
///
/// The reply must be a JSON object; markdown fencing or commentary around the
/// JSON is the model's non-conformance and is not repaired here.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResponse, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_display_names() {
        let raw = json!({
            "Executive Summary": "Looks fine overall",
            "Detailed Analysis": {
                "Content Discrepancies": {
                    "Summary": "one mismatch",
                    "Findings": [{
                        "Section": "header",
                        "Issue": "wrong title",
                        "Details": "title differs from spec",
                        "Code": "<h1>Helo</h1>",
                        "Recommended Fix": "fix the typo"
                    }]
                }
            },
            "Non-LLM Evaluations": null,
            "Other Issues": []
        })
        .to_string();

        let parsed = parse_analysis(&raw).unwrap();
        assert_eq!(
            parsed.executive_summary.as_deref(),
            Some("Looks fine overall")
        );
        let detailed = parsed.detailed_analysis.unwrap();
        let content = detailed.content_discrepancies.unwrap();
        assert_eq!(content.summary.as_deref(), Some("one mismatch"));
        assert_eq!(content.findings.len(), 1);
        assert_eq!(
            content.findings[0].recommended_fix.as_deref(),
            Some("fix the typo")
        );
        assert!(detailed.styling_discrepancies.is_none());
        assert!(parsed.non_llm_evaluations.is_none());
        assert!(parsed.other_issues.is_empty());
    }

    #[test]
    fn accepts_programmatic_aliases() {
        let raw = json!({
            "Executive_Summary": "aliased",
            "Detailed_Analysis": {
                "Functional_Discrepancies": {
                    "Summary": "s",
                    "Findings": [{"Issue": "i", "Recommended_Fix": "f"}]
                }
            },
            "Other_Issues": [{"Issue": "misc", "Recommended_Fix": "do it"}]
        })
        .to_string();

        let parsed = parse_analysis(&raw).unwrap();
        assert_eq!(parsed.executive_summary.as_deref(), Some("aliased"));
        let functional = parsed
            .detailed_analysis
            .unwrap()
            .functional_discrepancies
            .unwrap();
        assert_eq!(functional.findings[0].recommended_fix.as_deref(), Some("f"));
        assert_eq!(parsed.other_issues[0].issue.as_deref(), Some("misc"));
    }

    #[test]
    fn missing_keys_default_to_null_and_empty() {
        let parsed = parse_analysis("{}").unwrap();
        assert!(parsed.executive_summary.is_none());
        assert!(parsed.detailed_analysis.is_none());
        assert!(parsed.non_llm_evaluations.is_none());
        assert!(parsed.other_issues.is_empty());
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let parsed =
            parse_analysis(r#"{"Executive Summary": "ok", "Banana": 42}"#).unwrap();
        assert_eq!(parsed.executive_summary.as_deref(), Some("ok"));
    }

    #[test]
    fn rejects_non_object_replies() {
        assert!(parse_analysis("[]").is_err());
        assert!(parse_analysis("\"just text\"").is_err());
        assert!(parse_analysis("```json\n{}\n```").is_err());
        assert!(parse_analysis("not json at all").is_err());
    }

    #[test]
    fn finding_order_is_preserved() {
        let raw = json!({
            "Other Issues": [
                {"Issue": "first"},
                {"Issue": "second"},
                {"Issue": "third"}
            ]
        })
        .to_string();

        let parsed = parse_analysis(&raw).unwrap();
        let issues: Vec<_> = parsed
            .other_issues
            .iter()
            .map(|i| i.issue.as_deref().unwrap())
            .collect();
        assert_eq!(issues, ["first", "second", "third"]);
    }

    #[test]
    fn serializes_with_display_names() {
        let response = AnalysisResponse {
            executive_summary: Some("summary".to_string()),
            detailed_analysis: None,
            non_llm_evaluations: Some(NonLlmEvaluations {
                accessibility_report: Some(AuditReport {
                    summary: Some("a11y".to_string()),
                    key_findings: vec![KeyFinding {
                        issue: Some("contrast".to_string()),
                        recommended_fix: Some("darker text".to_string()),
                    }],
                }),
                ..Default::default()
            }),
            other_issues: Vec::new(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["Executive Summary"], "summary");
        assert!(value["Detailed Analysis"].is_null());
        assert_eq!(
            value["Non-LLM Evaluations"]["Accessibility Report"]["Key Findings"][0]
                ["Recommended Fix"],
            "darker text"
        );
        assert_eq!(value["Other Issues"], json!([]));
    }

    #[test]
    fn round_trips_verbatim() {
        let raw = json!({
            "Executive Summary": "s",
            "Detailed Analysis": {
                "Content Discrepancies": {"Summary": "c", "Findings": []},
                "Styling Discrepancies": {"Summary": "st", "Findings": []},
                "Intentional Flaws And Known Issues": {
                    "Summary": "if",
                    "Findings": [{"Category": "known", "Issue": "i", "Details": "d", "Recommended Fix": "f"}]
                },
                "Functional Discrepancies": {"Summary": "fd", "Findings": []}
            },
            "Non-LLM Evaluations": {
                "Accessibility Report": {"Summary": "ar", "Key Findings": []},
                "Performance Report": {"Summary": "pr", "Key Findings": []},
                "Validation Report": {"Summary": "vr", "Key Findings": []},
                "Layout Report": {"Summary": "lr", "Recommended Fix": "widen"}
            },
            "Other Issues": [{"Issue": "o", "Details": "od", "Code": "<p>", "Recommended Fix": "of"}]
        });

        let parsed = parse_analysis(&raw.to_string()).unwrap();
        let reserialized = serde_json::to_value(&parsed).unwrap();
        assert_eq!(reserialized, raw);
    }
}
