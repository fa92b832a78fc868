//! MCP tool input/output types.
//!
//! Defines the request and response shapes for the prediction tools. Tool
//! names and JSON field names are part of the agent-facing contract and must
//! stay stable across releases.

use rmcp::schemars;
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Date selector accepted by the date-aware tools.
///
/// Callers supply either a `date` string (a six-digit code or a natural
/// date) or a full `year`/`month`/`day` triple. A non-empty `date` wins over
/// the numeric fields.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DateArgs {
    /// Date string: a YYMMDD code such as "250613", or a natural date such
    /// as "2025-06-13" or "June 13, 2025". Takes precedence over the
    /// numeric fields. Leave empty for the current date.
    #[serde(default)]
    pub date: Option<String>,

    /// Year, full or two-digit (2025 or 25). Two-digit years 0-49 map to
    /// 20xx, 51-99 to 19xx. Use together with month and day.
    #[serde(default)]
    pub year: Option<i32>,

    /// Month (1-12). Use together with year and day.
    #[serde(default)]
    pub month: Option<u32>,

    /// Day (1-31). Use together with year and month.
    #[serde(default)]
    pub day: Option<u32>,
}

impl DateArgs {
    /// The `date` string, if present and non-blank after trimming.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.date
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// The numeric triple, only when all three fields are present.
    #[must_use]
    pub const fn triple(&self) -> Option<(i32, u32, u32)> {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) => Some((year, month, day)),
            _ => None,
        }
    }
}

/// Output from the `get_last_elements_by_date` tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DateDataOutput {
    /// The six-digit code the request resolved to.
    pub requested_date: String,

    /// The prediction record for that date.
    pub data: Value,
}

/// Output from the `get_current_date_data` tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CurrentDateOutput {
    /// Today's six-digit code.
    pub current_date: String,

    /// The prediction record for today.
    pub data: Value,
}

/// Output from the `format_date_yymmdd` tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FormatDateOutput {
    /// Echo of the caller-supplied input.
    pub input: Value,

    /// The six-digit YYMMDD code.
    pub formatted_date: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn text_trims_and_drops_blank_dates() {
        let args = DateArgs {
            date: Some("  250613  ".to_string()),
            ..DateArgs::default()
        };
        assert_eq!(args.text(), Some("250613"));

        let blank = DateArgs {
            date: Some("   ".to_string()),
            ..DateArgs::default()
        };
        assert_eq!(blank.text(), None);
        assert_eq!(DateArgs::default().text(), None);
    }

    #[test]
    fn triple_requires_all_three_fields() {
        let full = DateArgs {
            year: Some(2025),
            month: Some(6),
            day: Some(13),
            ..DateArgs::default()
        };
        assert_eq!(full.triple(), Some((2025, 6, 13)));

        let partial = DateArgs {
            year: Some(2025),
            month: Some(6),
            ..DateArgs::default()
        };
        assert_eq!(partial.triple(), None);
        assert_eq!(DateArgs::default().triple(), None);
    }

    #[test]
    fn deserializes_with_any_subset_of_fields() {
        let empty: DateArgs = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);
        assert_eq!(empty.triple(), None);

        let by_string: DateArgs = serde_json::from_str(r#"{"date": "250613"}"#).unwrap();
        assert_eq!(by_string.text(), Some("250613"));

        let by_triple: DateArgs =
            serde_json::from_str(r#"{"year": 25, "month": 6, "day": 13}"#).unwrap();
        assert_eq!(by_triple.triple(), Some((25, 6, 13)));
    }

    #[test]
    fn outputs_serialize_with_wire_field_names() {
        let output = FormatDateOutput {
            input: serde_json::json!({"year": 2025, "month": 6, "day": 13}),
            formatted_date: "250613".to_string(),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["formatted_date"], "250613");
        assert_eq!(value["input"]["year"], 2025);
    }
}
