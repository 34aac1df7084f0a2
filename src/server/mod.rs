//! Socket lifecycle and the accept loop.

pub mod lifecycle;
pub mod listener;

pub use lifecycle::{FileServer, ServerInfo, ServerOptions, StartResult, Status, StopResult};
