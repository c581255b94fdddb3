//! Reference computation engine for the terminal app.
//!
//! It does no ACB math: each CSV is parsed and its rows grouped per security
//! so the ingestion and rendering paths can be exercised end to end.

use std::fmt::Write as _;

use acb_core::{ResultModel, SymbolTable};
use acb_engine::{ComputeEngine, ComputeError, EngineResponse};
use csv::{ReaderBuilder, Trim};
use serde_json::{json, Value};

const SECURITY_COLUMN: &str = "security";

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TabulatingEngine;

#[async_trait::async_trait]
impl ComputeEngine for TabulatingEngine {
    /// Answers in the same JSON shape an out-of-process engine would.
    async fn compute(
        &self,
        filenames: &[String],
        contents: &[String],
    ) -> Result<EngineResponse, ComputeError> {
        let mut model = ResultModel::new();
        let mut text_output = String::new();
        let mut file_errors = Vec::new();

        for (name, content) in filenames.iter().zip(contents) {
            match tabulate_file(name, content, &mut model) {
                Ok(tally) if tally.rejected > 0 => {
                    let _ = writeln!(
                        text_output,
                        "{name}: {} row(s), {} rejected",
                        tally.accepted, tally.rejected
                    );
                }
                Ok(tally) => {
                    let _ = writeln!(text_output, "{name}: {} row(s)", tally.accepted);
                }
                Err(err) => {
                    let _ = writeln!(text_output, "{name}: skipped");
                    file_errors.push(format!("{name}: {err}"));
                }
            }
        }

        let mut symbols: Vec<_> = model.keys().cloned().collect();
        symbols.sort();
        for symbol in &symbols {
            if let Some(table) = model.get_mut(symbol) {
                table.footer = footer_for(table);
                let _ = writeln!(text_output, "{symbol}: {} row(s)", table.rows.len());
            }
        }

        let model_output = serde_json::to_value(&model)
            .map_err(|err| ComputeError::InvalidResponse(err.to_string()))?;
        let error = (!file_errors.is_empty()).then(|| file_errors.join("\n"));
        EngineResponse::from_json(json!({
            "result": {
                "textOutput": text_output,
                "modelOutput": model_output,
            },
            "error": error,
        }))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FileTally {
    accepted: usize,
    rejected: usize,
}

struct StagedRow {
    symbol: String,
    line: usize,
    cells: Vec<Value>,
    found_fields: Option<usize>,
}

/// Adds the rows of one file to the per-security tables. A file that fails
/// to parse, or has rows without a security, contributes nothing.
fn tabulate_file(name: &str, content: &str, model: &mut ResultModel) -> Result<FileTally, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());
    let header: Vec<String> = reader
        .headers()
        .map_err(|err| format!("csv error: {err}"))?
        .iter()
        .map(str::to_string)
        .collect();
    let security_idx = header
        .iter()
        .position(|column| column.eq_ignore_ascii_case(SECURITY_COLUMN))
        .ok_or_else(|| "no Security column".to_string())?;

    let mut staged = Vec::new();
    let mut orphan_rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| format!("csv error: {err}"))?;
        // Header is line 1.
        let line = idx + 2;
        let symbol = record.get(security_idx).unwrap_or_default();
        if symbol.is_empty() {
            orphan_rows.push(line);
            continue;
        }

        let mut cells: Vec<Value> = record
            .iter()
            .map(|cell| Value::String(cell.to_string()))
            .collect();
        let found_fields = (record.len() != header.len()).then_some(record.len());
        cells.resize(header.len(), Value::String(String::new()));
        staged.push(StagedRow {
            symbol: symbol.to_string(),
            line,
            cells,
            found_fields,
        });
    }
    if !orphan_rows.is_empty() {
        return Err(format!("rows without a security on lines {orphan_rows:?}"));
    }

    let mut tally = FileTally::default();
    for row in staged {
        let table = model.entry(row.symbol).or_insert_with(|| SymbolTable {
            header: header.clone(),
            ..SymbolTable::default()
        });
        if !same_columns(&table.header, &header) {
            table.errors.push(format!(
                "{name} line {}: columns differ from earlier files, row skipped",
                row.line
            ));
            tally.rejected += 1;
            continue;
        }
        if let Some(found) = row.found_fields {
            table.errors.push(format!(
                "{name} line {}: expected {} fields, found {found}",
                row.line,
                header.len()
            ));
        }
        table.rows.push(row.cells);
        tally.accepted += 1;
    }
    Ok(tally)
}

fn same_columns(left: &[String], right: &[String]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| l.eq_ignore_ascii_case(r))
}

fn footer_for(table: &SymbolTable) -> Vec<Value> {
    let mut footer = vec![Value::String(String::new()); table.header.len()];
    if let Some(first) = footer.first_mut() {
        *first = Value::String("Total".to_string());
    }
    if let Some(second) = footer.get_mut(1) {
        *second = Value::String(format!("{} row(s)", table.rows.len()));
    }
    footer
}
