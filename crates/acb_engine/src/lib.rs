//! ACB engine: file loading, transport decoding and compute invocation.
mod decode;
mod engine;
mod invoke;
mod load;
mod source;
mod types;

pub use decode::{decode_data_url, decode_payload, decode_text, DecodeError, DecodedText};
pub use engine::{EngineEvents, EngineHandle};
pub use invoke::{ComputeEngine, ComputeError, ComputeInvoker, EngineResponse, EngineResult};
pub use load::FileLoader;
pub use source::{FileSource, LocalFileSource, SourceSettings, TransportPayload};
pub use types::{EngineEvent, FailureKind, LoadError};
