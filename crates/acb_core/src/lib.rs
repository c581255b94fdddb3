//! ACB core: pure selection, ingestion and rendering state machine.
mod barrier;
mod effect;
mod model;
mod msg;
mod render;
mod selection;
mod state;
mod update;
mod view_model;

pub use barrier::{BarrierError, BarrierEvent, IngestionBarrier, LoadedBatch};
pub use effect::Effect;
pub use model::{
    cell_text, placeholder_model, ComputeOutcome, ResultModel, SymbolTable, PLACEHOLDER_HEADER,
    PLACEHOLDER_SYMBOL,
};
pub use msg::Msg;
pub use render::{
    render_document, Block, Document, RenderedTable, ResultRenderer, Row, RowKind,
    PARSED_STATE_DISCLAIMER,
};
pub use selection::{
    AddOutcome, CandidateFile, FileHandle, FileId, SelectedFile, SelectionRegistry,
    TABULAR_MEDIA_TYPE,
};
pub use state::{AppState, BatchId, DisplayMode};
pub use update::update;
pub use view_model::{AppViewModel, BatchProgress, FileRowView};
