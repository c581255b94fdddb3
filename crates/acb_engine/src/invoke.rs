use std::sync::Arc;

use acb_core::{ComputeOutcome, ResultModel};
use acb_logging::{acb_error, acb_info};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputeError {
    #[error("got {filenames} filenames but {contents} contents")]
    MismatchedInputs { filenames: usize, contents: usize },
    #[error("engine failed: {0}")]
    Engine(String),
    #[error("invalid engine response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineResult {
    #[serde(default)]
    pub text_output: String,
    #[serde(default)]
    pub model_output: Option<ResultModel>,
}

/// What the computation engine returns: best-effort output plus an optional
/// human-readable diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct EngineResponse {
    #[serde(default)]
    pub result: EngineResult,
    #[serde(default)]
    pub error: Option<String>,
}

impl EngineResponse {
    /// Parses the `{ result: { textOutput, modelOutput }, error }` JSON shape.
    pub fn from_json(value: Value) -> Result<Self, ComputeError> {
        serde_json::from_value(value).map_err(|err| ComputeError::InvalidResponse(err.to_string()))
    }
}

impl From<EngineResponse> for ComputeOutcome {
    fn from(response: EngineResponse) -> Self {
        ComputeOutcome {
            text_output: response.result.text_output,
            model_output: response.result.model_output,
            error: response.error.filter(|error| !error.is_empty()),
        }
    }
}

/// The external computation engine. Filenames and contents are index-correlated.
#[async_trait::async_trait]
pub trait ComputeEngine: Send + Sync {
    async fn compute(
        &self,
        filenames: &[String],
        contents: &[String],
    ) -> Result<EngineResponse, ComputeError>;
}

#[derive(Clone)]
pub struct ComputeInvoker {
    engine: Arc<dyn ComputeEngine>,
}

impl ComputeInvoker {
    pub fn new(engine: Arc<dyn ComputeEngine>) -> Self {
        Self { engine }
    }

    /// Calls the engine and normalizes its response. Failures are logged
    /// here; callers decide what (not) to show.
    pub async fn invoke(
        &self,
        filenames: &[String],
        contents: &[String],
    ) -> Result<ComputeOutcome, ComputeError> {
        if filenames.len() != contents.len() {
            let err = ComputeError::MismatchedInputs {
                filenames: filenames.len(),
                contents: contents.len(),
            };
            acb_error!("compute rejected: {}", err);
            return Err(err);
        }

        match self.engine.compute(filenames, contents).await {
            Ok(response) => {
                let outcome = ComputeOutcome::from(response);
                acb_info!(
                    "compute response received{}",
                    if outcome.error.is_some() { " with error" } else { "" }
                );
                Ok(outcome)
            }
            Err(err) => {
                acb_error!("compute caught error: {}", err);
                Err(err)
            }
        }
    }
}
