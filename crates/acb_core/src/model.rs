use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Symbol-keyed result of one computation. Key order carries no meaning.
pub type ResultModel = HashMap<String, SymbolTable>;

/// Tabular result for one symbol (e.g. a security ticker).
///
/// Rows and the footer are expected to have the header's width; the engine
/// owns that contract.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
    #[serde(default)]
    pub footer: Vec<Value>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Normalized result of one engine invocation.
///
/// `error` may be set together with partial text and model output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComputeOutcome {
    pub text_output: String,
    pub model_output: Option<ResultModel>,
    pub error: Option<String>,
}

pub const PLACEHOLDER_SYMBOL: &str = "STOCK";

pub const PLACEHOLDER_HEADER: [&str; 14] = [
    "Security",
    "Date",
    "TX",
    "Amount",
    "Shares",
    "Amt/Share",
    "ACB",
    "Commission",
    "Cap. Gain",
    "Share Balance",
    "ACB +/-",
    "New ACB",
    "New ACB/Share",
    "Memo",
];

/// Model shown before any computation has produced output.
pub fn placeholder_model() -> ResultModel {
    let mut footer = vec![Value::String(String::new()); PLACEHOLDER_HEADER.len()];
    footer[7] = Value::String("Total".to_string());
    footer[8] = Value::String("$0".to_string());

    let table = SymbolTable {
        header: PLACEHOLDER_HEADER.iter().map(|h| h.to_string()).collect(),
        rows: Vec::new(),
        footer,
        errors: Vec::new(),
        notes: Vec::new(),
    };
    HashMap::from([(PLACEHOLDER_SYMBOL.to_string(), table)])
}

/// Display text of a model cell: strings verbatim, null as empty, anything
/// else as its JSON text.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
