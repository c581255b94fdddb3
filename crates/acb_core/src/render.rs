use crate::model::{cell_text, placeholder_model, ResultModel, SymbolTable};

pub const PARSED_STATE_DISCLAIMER: &str =
    "Information is of parsed state only, and may not be fully correct.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Data,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedTable {
    pub rows: Vec<Row>,
}

impl RenderedTable {
    pub fn header(&self) -> Option<&Row> {
        self.rows.iter().find(|row| row.kind == RowKind::Header)
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.kind == RowKind::Data)
    }

    pub fn footer(&self) -> Option<&Row> {
        self.rows.iter().find(|row| row.kind == RowKind::Footer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    SymbolLabel(String),
    Error(String),
    Disclaimer,
    Table(RenderedTable),
    Note(String),
}

/// Flat sequence of blocks; each symbol contributes label, errors,
/// disclaimer, table and notes, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn tables(&self) -> impl Iterator<Item = &RenderedTable> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::SymbolLabel(symbol) => Some(symbol.as_str()),
            _ => None,
        })
    }
}

/// Renders `model` (or the placeholder when absent) with symbols in
/// ascending order.
pub fn render_document(model: Option<&ResultModel>) -> Document {
    let placeholder;
    let model = match model {
        Some(model) => model,
        None => {
            placeholder = placeholder_model();
            &placeholder
        }
    };

    let mut symbols: Vec<&String> = model.keys().collect();
    symbols.sort();

    let mut document = Document::default();
    for symbol in symbols {
        push_symbol(&mut document, symbol, &model[symbol]);
    }
    document
}

fn push_symbol(document: &mut Document, symbol: &str, table: &SymbolTable) {
    document.blocks.push(Block::SymbolLabel(symbol.to_string()));

    for error in &table.errors {
        document.blocks.push(Block::Error(error.clone()));
    }
    if !table.errors.is_empty() {
        document.blocks.push(Block::Disclaimer);
    }

    let mut rows = Vec::with_capacity(table.rows.len() + 2);
    rows.push(Row {
        kind: RowKind::Header,
        cells: table.header.clone(),
    });
    for row in &table.rows {
        rows.push(Row {
            kind: RowKind::Data,
            cells: row.iter().map(cell_text).collect(),
        });
    }
    rows.push(Row {
        kind: RowKind::Footer,
        cells: table.footer.iter().map(cell_text).collect(),
    });
    document.blocks.push(Block::Table(RenderedTable { rows }));

    for note in &table.notes {
        document.blocks.push(Block::Note(note.clone()));
    }
}

/// Holds the currently displayed document; every render replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRenderer {
    document: Document,
}

impl Default for ResultRenderer {
    fn default() -> Self {
        Self {
            document: render_document(None),
        }
    }
}

impl ResultRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, model: Option<&ResultModel>) -> &Document {
        self.document = render_document(model);
        &self.document
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}
