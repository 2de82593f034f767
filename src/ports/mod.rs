//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (time, filesystem, IDs, LLM, GitHub).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod github;
pub mod id_gen;
pub mod llm;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use github::{CandidateFile, EntryKind, HostError, HostFuture, RepoHost, RepositoryInfo};
pub use id_gen::IdGenerator;
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient, ResponseSchema};
