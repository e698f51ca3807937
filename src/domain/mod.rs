//! Domain types for the agent studio
//!
//! Everything here is plain data plus the normalization rules every
//! client applies to server responses, so it compiles for the browser too.

pub mod agent_type;
mod agent;
mod message;
mod tool;

/// Default location of the agent service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub use agent::*;
pub use agent_type::{lookup, registry, AgentType, AgentTypeInfo};
pub use message::*;
pub use tool::*;
