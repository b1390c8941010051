//! Named test procedures.

use std::future::Future;

/// Runs `test`, logging `Testing <name>` before and `[SUCCESS] <name>` after
/// it succeeds. Errors propagate unchanged.
pub async fn run_test_function<T, E, F, Fut>(name: &str, test: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    tracing::info!(test = name, "Testing {name}");
    let value = test().await?;
    tracing::info!(test = name, "[SUCCESS] {name}");
    Ok(value)
}
