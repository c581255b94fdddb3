use std::sync::Once;

use acb_core::{
    update, AppState, Block, CandidateFile, ComputeOutcome, DisplayMode, Effect, FileHandle, Msg,
    ResultModel, SymbolTable, PLACEHOLDER_SYMBOL,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(acb_logging::initialize_for_tests);
}

fn csv(name: &str) -> CandidateFile {
    CandidateFile {
        name: name.to_string(),
        media_type: "text/csv".to_string(),
        size: None,
        last_modified: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap(),
        handle: FileHandle::new(name),
    }
}

fn select(state: AppState, names: &[&str]) -> AppState {
    let (state, effects) = update(
        state,
        Msg::FilesSelected(names.iter().map(|name| csv(name)).collect()),
    );
    assert!(effects.is_empty());
    state
}

fn loaded(batch_id: u64, name: &str, content: &str) -> Msg {
    Msg::FileLoaded {
        batch_id,
        name: name.to_string(),
        content: content.to_string(),
    }
}

fn outcome_for(symbol: &str) -> ComputeOutcome {
    let mut model = ResultModel::new();
    model.insert(
        symbol.to_string(),
        SymbolTable {
            header: vec!["Security".to_string()],
            rows: vec![vec![json!(symbol)]],
            footer: vec![json!("")],
            errors: Vec::new(),
            notes: Vec::new(),
        },
    );
    ComputeOutcome {
        text_output: format!("{symbol} report"),
        model_output: Some(model),
        error: None,
    }
}

#[test]
fn selecting_files_enables_run() {
    init_logging();
    let mut state = select(AppState::new(), &["a.csv", "b.csv", "a.csv"]);

    let view = state.view();
    assert!(view.run_enabled);
    assert_eq!(
        view.files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        vec!["a.csv", "b.csv"]
    );
    assert!(state.consume_dirty());

    let (state, _) = update(state, Msg::RemoveFileClicked(1));
    let (state, _) = update(state, Msg::RemoveFileClicked(2));
    assert!(!state.view().run_enabled);
    assert!(state.view().files.is_empty());
}

#[test]
fn run_without_files_is_a_noop() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::RunClicked);

    assert!(effects.is_empty());
    assert_eq!(state.view().batch, None);
    assert_eq!(state.last_batch_id(), 0);
}

#[test]
fn run_loads_every_file_then_computes_once() {
    init_logging();
    let state = select(AppState::new(), &["a.csv", "b.csv"]);

    let (state, effects) = update(state, Msg::RunClicked);
    let loads: Vec<_> = effects
        .iter()
        .map(|effect| match effect {
            Effect::LoadFile { batch_id, file } => (*batch_id, file.name.clone()),
            other => panic!("unexpected effect {other:?}"),
        })
        .collect();
    assert_eq!(loads, vec![(1, "a.csv".to_string()), (1, "b.csv".to_string())]);

    let (state, effects) = update(state, loaded(1, "b.csv", "B"));
    assert!(effects.is_empty());
    let progress = state.view().batch.expect("batch in flight");
    assert_eq!((progress.loaded, progress.total, progress.computing), (1, 2, false));

    let (state, effects) = update(state, loaded(1, "a.csv", "A"));
    assert_eq!(
        effects,
        vec![Effect::Compute {
            batch_id: 1,
            filenames: vec!["b.csv".to_string(), "a.csv".to_string()],
            contents: vec!["B".to_string(), "A".to_string()],
        }]
    );
    assert!(state.view().batch.expect("computing").computing);

    let (state, effects) = update(state, loaded(1, "a.csv", "A"));
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::ComputeFinished {
            batch_id: 1,
            outcome: outcome_for("XEQT"),
        },
    );
    let view = state.view();
    assert_eq!(view.batch, None);
    assert_eq!(view.text_output, "XEQT report");
    assert_eq!(view.document.symbols().collect::<Vec<_>>(), vec!["XEQT"]);
}

#[test]
fn removing_a_file_mid_run_does_not_affect_the_batch() {
    init_logging();
    let state = select(AppState::new(), &["a.csv", "b.csv"]);
    let (state, _) = update(state, Msg::RunClicked);
    let (state, _) = update(state, Msg::RemoveFileClicked(2));

    let (state, _) = update(state, loaded(1, "a.csv", "A"));
    let (_state, effects) = update(state, loaded(1, "b.csv", "B"));

    assert!(matches!(effects.as_slice(), [Effect::Compute { filenames, .. }] if filenames.len() == 2));
}

#[test]
fn new_run_supersedes_in_flight_batch() {
    init_logging();
    let state = select(AppState::new(), &["a.csv"]);
    let (state, _) = update(state, Msg::RunClicked);
    let (state, effects) = update(state, Msg::RunClicked);
    assert!(matches!(effects.as_slice(), [Effect::LoadFile { batch_id: 2, .. }]));

    let (state, effects) = update(state, loaded(1, "a.csv", "old"));
    assert!(effects.is_empty());
    assert_eq!(state.view().batch.expect("batch 2").loaded, 0);

    let (state, effects) = update(state, loaded(2, "a.csv", "new"));
    assert!(matches!(
        effects.as_slice(),
        [Effect::Compute { batch_id: 2, contents, .. }] if contents == &vec!["new".to_string()]
    ));

    let (state, _) = update(
        state,
        Msg::ComputeFinished {
            batch_id: 1,
            outcome: outcome_for("OLD"),
        },
    );
    assert_eq!(state.view().document.symbols().collect::<Vec<_>>(), vec![PLACEHOLDER_SYMBOL]);
}

#[test]
fn partial_error_is_shown_with_model() {
    init_logging();
    let state = select(AppState::new(), &["a.csv"]);
    let (state, _) = update(state, Msg::RunClicked);
    let (state, _) = update(state, loaded(1, "a.csv", "A"));

    let mut outcome = outcome_for("VFV");
    outcome.error = Some("line 3: invalid date".to_string());
    let (state, _) = update(state, Msg::ComputeFinished { batch_id: 1, outcome });

    let view = state.view();
    assert_eq!(view.error_text.as_deref(), Some("line 3: invalid date"));
    assert_eq!(view.document.blocks[0], Block::SymbolLabel("VFV".to_string()));
}

#[test]
fn compute_failure_keeps_previous_output() {
    init_logging();
    let state = select(AppState::new(), &["a.csv"]);
    let (state, _) = update(state, Msg::RunClicked);
    let (state, _) = update(state, loaded(1, "a.csv", "A"));
    let (state, _) = update(
        state,
        Msg::ComputeFinished {
            batch_id: 1,
            outcome: outcome_for("XEQT"),
        },
    );
    let before = state.view();

    let (state, _) = update(state, Msg::RunClicked);
    let (state, _) = update(state, loaded(2, "a.csv", "A"));
    let (state, effects) = update(
        state,
        Msg::ComputeFailed {
            batch_id: 2,
            message: "engine crashed".to_string(),
        },
    );

    assert!(effects.is_empty());
    let after = state.view();
    assert_eq!(after.batch, None);
    assert_eq!(after.text_output, before.text_output);
    assert_eq!(after.document, before.document);
}

#[test]
fn load_failure_leaves_batch_pending() {
    init_logging();
    let state = select(AppState::new(), &["a.csv", "b.csv"]);
    let (state, _) = update(state, Msg::RunClicked);
    let (state, _) = update(state, loaded(1, "a.csv", "A"));
    let (state, effects) = update(
        state,
        Msg::FileLoadFailed {
            batch_id: 1,
            name: "b.csv".to_string(),
            error: "permission denied".to_string(),
        },
    );

    assert!(effects.is_empty());
    let progress = state.view().batch.expect("still pending");
    assert_eq!((progress.loaded, progress.total), (1, 2));
}

#[test]
fn display_modes_are_exclusive() {
    init_logging();
    let mut state = AppState::new();
    assert_eq!(state.view().display_mode, DisplayMode::Table);

    let (mut next, _) = update(state.clone(), Msg::ShowText);
    assert_eq!(next.display_mode(), DisplayMode::Text);
    assert!(next.consume_dirty());

    let (mut next, _) = update(next, Msg::ShowText);
    assert!(!next.consume_dirty());

    let (next, _) = update(next, Msg::ShowTable);
    assert_eq!(next.display_mode(), DisplayMode::Table);
    assert!(!state.consume_dirty());

    let state = AppState::with_display_mode(DisplayMode::Text);
    assert_eq!(state.view().display_mode, DisplayMode::Text);
}
