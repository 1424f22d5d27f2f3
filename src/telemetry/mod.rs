pub mod init;
pub mod metrics;

pub use init::{TelemetryGuard, init_telemetry};
pub use metrics::{BFHL_OPERATIONS, HTTP_REQUEST_DURATION, HTTP_REQUESTS_TOTAL};
