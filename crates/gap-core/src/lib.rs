#![deny(missing_docs)]
#![doc = "Core types and error surface for the gap genome assembly pipeline."]

pub mod engine;
pub mod errors;
pub mod kmer;
/// Per unit outcomes recorded by the orchestrator.
pub mod status;

pub use engine::{Engine, EngineToggles};
pub use errors::{io_error, ErrorInfo, GapError};
pub use kmer::{KmerConfig, KmerValue, AUTO, VELVET_DEFAULT_KMER};
pub use status::RunStatus;
