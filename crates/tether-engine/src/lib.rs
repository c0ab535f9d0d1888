//! # Tether Engine
//!
//! The dispatch side of Tether: a pure tool factory, a kind-keyed handler
//! registry, and a validate-then-execute pipeline that turns the model's
//! raw tool calls into string results or classified errors.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tether_engine::{
//!     Catalogue, EngineConfig, ToolExecutor, ToolFactory, ToolRuntime, TurnContext,
//!     handlers::{PortSet, build_registry},
//! };
//! use tether_core::tool::ToolKind;
//!
//! # fn ports() -> PortSet { unimplemented!() }
//! let config = EngineConfig::default();
//! let registry = build_registry(&ports(), &config);
//!
//! let turn = TurnContext::default();
//! let mut tools = Vec::new();
//! for kind in ToolFactory::supported_kinds() {
//!     tools.extend(ToolFactory::create(*kind, None, Some(&turn)).unwrap_or_default());
//! }
//! let catalogue = Catalogue::from_tools(tools).expect("unique names");
//! let runtime = ToolRuntime::new(catalogue, ToolExecutor::new(registry));
//! ```

pub mod catalogue;
pub mod config;
pub mod executor;
pub mod factory;
pub mod handlers;
pub mod ports;
pub mod registry;
pub mod runtime;

pub use catalogue::{Catalogue, CatalogueError};
pub use config::{ConfigError, EngineConfig};
pub use executor::ToolExecutor;
pub use factory::{FactoryError, ToolFactory, TurnContext};
pub use ports::{AttachError, PortError};
pub use registry::{BoxError, HandlerFailure, HandlerRegistry, Invocation, ToolHandler};
pub use runtime::ToolRuntime;
