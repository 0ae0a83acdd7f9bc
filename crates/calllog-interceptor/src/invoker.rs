//! Timed handler invocation.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

/// How the wrapped handler finished.
pub enum Invocation<T, E> {
    /// The handler returned a value.
    Returned(T),
    /// The handler returned an error.
    Raised(E),
    /// The handler panicked; holds the panic payload.
    Panicked(Box<dyn Any + Send>),
}

/// Handler outcome together with its timing.
pub struct Timed<T, E> {
    /// Handler outcome.
    pub outcome: Invocation<T, E>,
    /// Wall-clock time the handler was entered.
    pub started_at: DateTime<Utc>,
    /// Time between entering the handler and it finishing.
    pub elapsed: Duration,
}

/// Runs the handler and measures exactly its execution.
///
/// The timer starts immediately before the handler is called and stops as
/// soon as it returns, errors or panics.
pub async fn invoke_timed<T, E, F, Fut>(handler: F) -> Timed<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let started_at = Utc::now();
    let started = Instant::now();
    let result = AssertUnwindSafe(async move { handler().await })
        .catch_unwind()
        .await;
    let elapsed = started.elapsed();

    let outcome = match result {
        Ok(Ok(value)) => Invocation::Returned(value),
        Ok(Err(err)) => Invocation::Raised(err),
        Err(payload) => Invocation::Panicked(payload),
    };

    Timed {
        outcome,
        started_at,
        elapsed,
    }
}
