//! Data model for a single probe run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Attributes read from the first `label` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelAttributes {
    /// Value of the `for` attribute, `None` when absent
    pub for_value: Option<String>,
}

/// Attributes read from the first `input` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAttributes {
    /// Value of the `id` attribute, `None` when absent
    pub id_value: Option<String>,
}

/// Logical outcome of the association check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Success,
    Failure,
}

impl Verdict {
    /// Both values must be present, non-empty and equal.
    pub fn evaluate(label: &LabelAttributes, input: &InputAttributes) -> Self {
        match (label.for_value.as_deref(), input.id_value.as_deref()) {
            (Some(for_value), Some(id_value))
                if !for_value.is_empty() && for_value == id_value =>
            {
                Self::Success
            }
            _ => Self::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Human-readable verdict line
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => {
                "SUCCESS: Label is correctly associated with input via 'for' and 'id' attributes."
            }
            Self::Failure => "FAILURE: Label is NOT correctly associated with input.",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Outcome of one probe run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub url: String,
    pub label: LabelAttributes,
    pub input: InputAttributes,
    pub verdict: Verdict,
    pub screenshot_path: PathBuf,
    pub checked_at: DateTime<Utc>,
}

impl ProbeReport {
    pub fn new(
        url: impl Into<String>,
        label: LabelAttributes,
        input: InputAttributes,
        screenshot_path: impl Into<PathBuf>,
    ) -> Self {
        let verdict = Verdict::evaluate(&label, &input);
        Self {
            url: url.into(),
            label,
            input,
            verdict,
            screenshot_path: screenshot_path.into(),
            checked_at: Utc::now(),
        }
    }

    /// The three console lines, in their fixed order
    pub fn console_lines(&self) -> [String; 3] {
        [
            format!("Label for: {}", display_value(&self.label.for_value)),
            format!("Input id: {}", display_value(&self.input.id_value)),
            self.verdict.message().to_string(),
        ]
    }

    /// Write the console lines to `out`
    pub fn write_console<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        for line in self.console_lines() {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn display_value(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}
