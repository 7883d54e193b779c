use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    Important,
    Info,
}

/// Named extraction rules. Every non-blank line of a block is attributed to
/// at least one rule; `Note` collects the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    HeaderLine,
    Segment,
    Fare,
    CabinHint,
    Installments,
    Incentive,
    Fee,
    Commission,
    ChangePenalty,
    Refund,
    Baggage,
    Payment,
    NetFare,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Fare class token outside the known vocabulary, passed through verbatim.
    UnknownCategory,
    /// `in X%` matched inside a longer line rather than on its own.
    IncentiveInProse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub kind: WarningKind,
    pub severity: TraceSeverity,
    pub line_index: usize,
    pub text: String,
    pub message: String,
}

impl ParseWarning {
    pub fn unknown_category(line_index: usize, text: &str, token: &str) -> Self {
        Self {
            kind: WarningKind::UnknownCategory,
            severity: TraceSeverity::Important,
            line_index,
            text: text.to_string(),
            message: format!("Unrecognized fare class '{}' passed through verbatim", token),
        }
    }

    pub fn incentive_in_prose(line_index: usize, text: &str) -> Self {
        Self {
            kind: WarningKind::IncentiveInProse,
            severity: TraceSeverity::Info,
            line_index,
            text: text.to_string(),
            message: "Incentive percent taken from a line with other text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub line_index: usize,
    pub rule: RuleKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTrace {
    pub label: String,
    pub steps: Vec<TraceStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

impl BlockTrace {
    pub fn hits(&self, rule: RuleKind) -> usize {
        self.steps.iter().filter(|s| s.rule == rule).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    pub is_multi: bool,
    pub blocks: Vec<BlockTrace>,
}

impl Default for TraceBundle {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            is_multi: false,
            blocks: Vec::new(),
        }
    }
}

impl TraceBundle {
    pub fn warnings(&self) -> impl Iterator<Item = &ParseWarning> {
        self.blocks.iter().flat_map(|b| b.warnings.iter())
    }
}
