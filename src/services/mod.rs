//! 服务模块

pub mod console;
pub mod trace;
pub mod upstream;
pub mod viewmodel;

pub use console::{
    BackendReply, ConsoleState, HttpSearchBackend, SearchBackend, SearchConsoleController,
    create_search_backend,
};
pub use trace::{TraceIdGenerator, UuidTraceIdGenerator, create_trace_id_generator};
pub use upstream::{HttpUpstreamClient, UpstreamClient, UpstreamReply, create_upstream_client};
pub use viewmodel::view_results;
