//! Prompt assembly for the webpage analysis call.
//!
//! `build_prompt` is a pure function: validated inputs in, one prompt string
//! out. The prompt pins the model to a raw-JSON reply shaped exactly like
//! [`crate::schema::AnalysisResponse`] by embedding a literal example of the
//! expected output, then appends the caller's inputs and any third-party
//! audit sections. Same inputs always produce the same prompt.

use serde_json::{Map, Value};
use std::fmt::Write;

/// Literal example the model must imitate, key for key.
const EXAMPLE_OUTPUT_FORMAT: &str = r#"{
  "Executive Summary": "...",
  "Detailed Analysis": {
    "Content Discrepancies": {
      "Summary": "...",
      "Findings": [
        {
          "Section": "...",
          "Issue": "...",
          "Details": "...",
          "Code": "...",
          "Recommended Fix": "..."
        }
      ]
    },
    "Styling Discrepancies": {
      "Summary": "...",
      "Findings": [
        {
          "Section": "...",
          "Issue": "...",
          "Details": "...",
          "Code": "...",
          "Recommended Fix": "..."
        }
      ]
    },
    "Intentional Flaws And Known Issues": {
      "Summary": "...",
      "Findings": [
        {
          "Category": "...",
          "Issue": "...",
          "Details": "...",
          "Recommended Fix": "..."
        }
      ]
    },
    "Functional Discrepancies": {
      "Summary": "...",
      "Findings": [
        {
          "Issue": "...",
          "Details": "...",
          "Code": "...",
          "Recommended Fix": "..."
        }
      ]
    }
  },
  "Non-LLM Evaluations": {
    "Accessibility Report": {
      "Summary": "...",
      "Key Findings": [
        {
          "Issue": "...",
          "Recommended Fix": "..."
        }
      ]
    },
    "Performance Report": {
      "Summary": "...",
      "Key Findings": [
        {
          "Issue": "...",
          "Recommended Fix": "..."
        }
      ]
    },
    "Validation Report": {
      "Summary": "...",
      "Key Findings": [
        {
          "Issue": "...",
          "Recommended Fix": "..."
        }
      ]
    },
    "Layout Report": {
      "Summary": "...",
      "Recommended Fix": "..."
    }
  },
  "Other Issues": [
      {
          "Issue": "...",
          "Details": "...",
          "Code": "...",
          "Recommended Fix": "..."
      }
    ]
}
"#;

const PREAMBLE: &str = "Please perform a comprehensive UI analysis of the html mentioned and generate STRICTLY a JSON report \
(No additional text except the JSON response: Start with \"{\", end with \"}\". No markdown. Raw JSON as text.). The output must strictly follow the JSON structure provided \
in the 'Example Output Format' section below. Fill in the data based on my inputs, ensuring no deviation \
from the provided keys, nesting, or data types. Fill key \"code\" with the affected html code only. Fill the key \"Non-LLM Evaluations\" as null if input non-LLM Evaluations are not given (\"Non-LLM Evaluations\": null). If any key is inapplicable, fill it as null if the corresponding value is an object, fill it as [] (empty array) if corresponding value is an array.\n\n\
We are only concerned with a desktop screen analysis.\n\n\
**Example Output Format:**\n\n";

/// Parse the raw audit text into a JSON object, treating anything that is not
/// a well-formed object as absent. Structural validation happens upstream in
/// the input validator; the builder stays lenient on its own.
fn parse_evaluations(audit_results_raw: &str) -> Map<String, Value> {
    if audit_results_raw.is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(audit_results_raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Python-style truthiness over a JSON value: null, false, zero, and empty
/// strings/collections are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn indented_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Build the analysis prompt from validated inputs.
///
/// * `specification` falls back to the literal placeholder `None` when empty.
/// * A note about the attached design file is emitted only when one is
///   present; the image itself travels as a separate content part.
/// * The four recognized audit sections are gated individually:
///   accessibility and validation results on truthiness, performance and
///   overflow results on being non-null (so `false`/`0` still get reported).
pub fn build_prompt(
    html_text: &str,
    specification: &str,
    has_design_file: bool,
    audit_results_raw: &str,
) -> String {
    let evaluations = parse_evaluations(audit_results_raw);

    let mut prompt = String::with_capacity(
        PREAMBLE.len() + EXAMPLE_OUTPUT_FORMAT.len() + html_text.len() + specification.len() + 256,
    );
    prompt.push_str(PREAMBLE);
    prompt.push_str(EXAMPLE_OUTPUT_FORMAT);

    let spec_text = if specification.is_empty() {
        "None"
    } else {
        specification
    };
    let _ = write!(
        prompt,
        "\n**Inputs for Analysis:**\n\n1. **HTML (Text):**\n{html_text}\n\n2. **Specifications:**\n{spec_text}\n\n"
    );
    if has_design_file {
        prompt.push_str("3. Find the Design File attached.\n\n");
    }
    let marker = if evaluations.is_empty() { "" } else { "null" };
    let _ = write!(prompt, "**Non-LLM Evaluations:** {marker}\n\n");

    if let Some(axe) = evaluations.get("axeCoreResult").filter(|v| is_truthy(v)) {
        let _ = write!(
            prompt,
            "* **Accessibility Summary:**\n{}\n\n",
            indented_json(axe)
        );
    }
    if let Some(pagespeed) = evaluations.get("pageSpeedResult").filter(|v| !v.is_null()) {
        let _ = write!(
            prompt,
            "* **Performance Summary:**\n{}\n\n",
            indented_json(pagespeed)
        );
    }
    if let Some(nu) = evaluations.get("nuValidatorResult").filter(|v| is_truthy(v)) {
        let _ = write!(
            prompt,
            "* **Validation Summary:**\n{}\n\n",
            indented_json(nu)
        );
    }
    if let Some(overflow) = evaluations
        .get("responsivenessResult")
        .filter(|v| !v.is_null())
    {
        let _ = write!(
            prompt,
            "* **Overflow Status:**\n{}\n\n",
            indented_json(overflow)
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_html_and_example_schema() {
        let prompt = build_prompt("<h1>Hello</h1>", "", false, "");
        assert!(prompt.starts_with("Please perform a comprehensive UI analysis"));
        assert!(prompt.contains("**Example Output Format:**"));
        assert!(prompt.contains("\"Executive Summary\": \"...\""));
        assert!(prompt.contains("1. **HTML (Text):**\n<h1>Hello</h1>\n\n"));
    }

    #[test]
    fn empty_specification_becomes_none_placeholder() {
        let prompt = build_prompt("<p/>", "", false, "");
        assert!(prompt.contains("2. **Specifications:**\nNone\n\n"));

        let prompt = build_prompt("<p/>", "Must follow accessibility", false, "");
        assert!(prompt.contains("2. **Specifications:**\nMust follow accessibility\n\n"));
    }

    #[test]
    fn design_file_note_only_when_attached() {
        let with_file = build_prompt("<p/>", "", true, "");
        assert!(with_file.contains("3. Find the Design File attached.\n\n"));

        let without_file = build_prompt("<p/>", "", false, "");
        assert!(!without_file.contains("Find the Design File attached"));
    }

    #[test]
    fn evaluations_marker_reflects_presence() {
        let without = build_prompt("<p/>", "", false, "");
        assert!(without.contains("**Non-LLM Evaluations:** \n\n"));

        let audit = r#"{"axeCoreResult": [], "pageSpeedResult": null,
                        "nuValidatorResult": null, "responsivenessResult": null}"#;
        let with = build_prompt("<p/>", "", false, audit);
        assert!(with.contains("**Non-LLM Evaluations:** null\n\n"));
    }

    #[test]
    fn truthy_gated_sections_skip_empty_values() {
        let audit = r#"{"axeCoreResult": [], "pageSpeedResult": null,
                        "nuValidatorResult": "", "responsivenessResult": null}"#;
        let prompt = build_prompt("<p/>", "", false, audit);
        assert!(!prompt.contains("Accessibility Summary"));
        assert!(!prompt.contains("Performance Summary"));
        assert!(!prompt.contains("Validation Summary"));
        assert!(!prompt.contains("Overflow Status"));
    }

    #[test]
    fn not_null_gated_sections_keep_falsy_values() {
        // pageSpeedResult 0 and responsivenessResult false are falsy but not
        // null, and must still be reported.
        let audit = r#"{"axeCoreResult": {"violations": 2}, "pageSpeedResult": 0,
                        "nuValidatorResult": ["warning"], "responsivenessResult": false}"#;
        let prompt = build_prompt("<p/>", "", false, audit);
        assert!(prompt.contains("* **Accessibility Summary:**\n{\n  \"violations\": 2\n}"));
        assert!(prompt.contains("* **Performance Summary:**\n0\n\n"));
        assert!(prompt.contains("* **Validation Summary:**\n[\n  \"warning\"\n]"));
        assert!(prompt.contains("* **Overflow Status:**\nfalse\n\n"));
    }

    #[test]
    fn malformed_audit_json_is_treated_as_absent() {
        let prompt = build_prompt("<p/>", "", false, "{not json");
        assert!(prompt.contains("**Non-LLM Evaluations:** \n\n"));
        assert!(!prompt.contains("Accessibility Summary"));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let audit = r#"{"axeCoreResult": {"a": 1}, "pageSpeedResult": 95,
                        "nuValidatorResult": null, "responsivenessResult": null}"#;
        let a = build_prompt("<div>x</div>", "spec", true, audit);
        let b = build_prompt("<div>x</div>", "spec", true, audit);
        assert_eq!(a, b);
    }
}
