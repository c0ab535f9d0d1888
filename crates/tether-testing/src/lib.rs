//! # Tether Testing
//!
//! In-memory fakes for every outbound port in `tether-engine`, with
//! builder-style setup and call recording so tests can assert on what the
//! handlers actually did. These are deterministic stand-ins, not mocks
//! with expectations: configure state up front, run the handler, inspect.

mod artifact_store;
mod gateways;
mod mcp_client;
mod search_service;
mod skill_directory;
mod source_store;
mod thread_store;

pub use artifact_store::RecordingArtifactStore;
pub use gateways::{StubCodeRunner, StubHttpGateway, StubWebSearcher};
pub use mcp_client::StubMcpClient;
pub use search_service::ScriptedSearchService;
pub use skill_directory::StaticSkillDirectory;
pub use source_store::InMemorySourceStore;
pub use thread_store::InMemoryThreadStore;
