pub mod request_trace;
pub mod require_permission;
pub mod structured_logger;

pub use request_trace::{RequestTrace, TraceId};
pub use require_permission::RequirePermission;
pub use structured_logger::StructuredLogger;
