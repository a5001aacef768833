//! Response schema for schema-constrained report generation.

use serde_json::{json, Value};

use super::RadarScores;

/// The JSON schema the text-generation service must follow for a report.
///
/// Uses the service's upper-case type names (OBJECT, ARRAY, STRING, INTEGER).
pub fn insight_response_schema() -> Value {
    let radar_properties: serde_json::Map<String, Value> = RadarScores::AXES
        .iter()
        .map(|axis| (axis.to_string(), json!({ "type": "INTEGER" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "weekly_summary": { "type": "STRING" },
            "keywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "radar": {
                "type": "OBJECT",
                "properties": radar_properties,
                "required": RadarScores::AXES
            }
        },
        "required": ["weekly_summary", "keywords", "radar"]
    })
}
