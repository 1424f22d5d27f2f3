use opentelemetry::KeyValue;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::llm::LlmClient;
use crate::math;
use crate::telemetry::BFHL_OPERATIONS;

use super::BfhlRequest;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BfhlOutput {
    Sequence(Vec<u64>),
    Numbers(Vec<i64>),
    Number(u64),
    Answer(String),
}

#[tracing::instrument(
    name = "bfhl.dispatch",
    skip(request, llm_client),
    fields(bfhl.operation = request.operation(), bfhl.outcome)
)]
pub async fn dispatch(request: BfhlRequest, llm_client: &LlmClient) -> AppResult<BfhlOutput> {
    let operation = request.operation();

    let result: AppResult<BfhlOutput> = match request {
        BfhlRequest::Fibonacci(n) => {
            blocking(move || Ok(BfhlOutput::Sequence(math::fibonacci(n)?))).await
        }
        BfhlRequest::Prime(values) => {
            blocking(move || {
                Ok(BfhlOutput::Numbers(
                    values.into_iter().filter(|&v| math::is_prime(v)).collect(),
                ))
            })
            .await
        }
        BfhlRequest::Lcm(values) => {
            blocking(move || Ok(BfhlOutput::Number(math::lcm(&values)?))).await
        }
        BfhlRequest::Hcf(values) => {
            blocking(move || Ok(BfhlOutput::Number(math::hcf(&values)?))).await
        }
        BfhlRequest::Ai(question) => Ok(BfhlOutput::Answer(
            llm_client.answer(&question).await.to_string(),
        )),
    };

    let outcome = if result.is_ok() { "success" } else { "error" };
    tracing::Span::current().record("bfhl.outcome", outcome);
    BFHL_OPERATIONS.add(
        1,
        &[
            KeyValue::new("bfhl.operation", operation),
            KeyValue::new("bfhl.outcome", outcome),
        ],
    );

    if let Err(err) = &result {
        tracing::info!(operation, error = %err, "Operation rejected");
    }

    result
}

/// Arithmetic runs on the blocking pool so long inputs never stall a runtime worker.
async fn blocking<F>(operation: F) -> AppResult<BfhlOutput>
where
    F: FnOnce() -> AppResult<BfhlOutput> + Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {e}")))?
}
