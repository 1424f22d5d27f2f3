pub mod bfhl;
pub mod config;
pub mod error;
pub mod llm;
pub mod math;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm_client: Arc<llm::LlmClient>,
}
