use std::fmt::Write as _;

use acb_core::{AppViewModel, Block, DisplayMode, Document, RenderedTable, PARSED_STATE_DISCLAIMER};

/// Renders the whole view as terminal text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Files:");
    if view.files.is_empty() {
        let _ = writeln!(out, "  (none, use 'add <path>')");
    }
    for file in &view.files {
        let _ = writeln!(
            out,
            "  [{}] {} (modified {})",
            file.id,
            file.name,
            file.last_modified.format("%Y-%m-%d %H:%M:%S")
        );
    }
    let _ = writeln!(
        out,
        "Run: {}",
        if view.run_enabled { "enabled" } else { "disabled" }
    );
    if let Some(batch) = &view.batch {
        if batch.computing {
            let _ = writeln!(out, "Batch {}: computing", batch.batch_id);
        } else {
            let _ = writeln!(
                out,
                "Batch {}: loaded {}/{} file(s)",
                batch.batch_id, batch.loaded, batch.total
            );
        }
    }

    match view.display_mode {
        DisplayMode::Text => {
            let _ = writeln!(out, "---- text output ----");
            out.push_str(&view.text_output);
            if !view.text_output.is_empty() && !view.text_output.ends_with('\n') {
                out.push('\n');
            }
        }
        DisplayMode::Table => {
            let _ = writeln!(out, "---- table output ----");
            out.push_str(&render_document(&view.document));
        }
    }
    if let Some(error) = &view.error_text {
        let _ = writeln!(out, "Error: {error}");
    }
    out
}

/// Writes each symbol's label, errors, disclaimer, table rows as CSV, and notes.
pub fn render_document(document: &Document) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        match block {
            Block::SymbolLabel(symbol) => {
                let _ = writeln!(out, "\n{symbol}");
            }
            Block::Error(error) => {
                let _ = writeln!(out, "[!] {error}");
            }
            Block::Disclaimer => {
                let _ = writeln!(out, "{PARSED_STATE_DISCLAIMER}");
            }
            Block::Table(table) => match table_to_csv(table) {
                Ok(text) => out.push_str(&text),
                Err(err) => {
                    let _ = writeln!(out, "[!] could not render table: {err}");
                }
            },
            Block::Note(note) => {
                let _ = writeln!(out, "{note}");
            }
        }
    }
    out
}

fn table_to_csv(table: &RenderedTable) -> Result<String, csv::Error> {
    // Rows are written as given, even if their width differs from the header.
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in &table.rows {
        writer.write_record(&row.cells)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
