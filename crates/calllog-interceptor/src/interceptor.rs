//! The call interceptor.

use crate::{
    cancellation_failure, invoke_timed, FailureClassifier, InterceptedCall, Invocation,
    LogEmitter, MetadataExtractor, ScopeMatcher,
};
use calllog_config::{FailurePolicy, InterceptorConfig};
use calllog_core::{
    ArgValue, CallLogError, CallLogResult, HandlerFailure, LogSink, RequestContextAccessor,
    StackTraceFormatter, ValueSerializer,
};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// URL logged on the completion line when the request context was unavailable.
const UNKNOWN_URL: &str = "-";

/// Host capabilities injected into the interceptor.
#[derive(Clone)]
pub struct Capabilities {
    pub request_context: Arc<dyn RequestContextAccessor>,
    pub serializer: Arc<dyn ValueSerializer>,
    pub stack_trace_formatter: Arc<dyn StackTraceFormatter>,
    pub log_sink: Arc<dyn LogSink>,
}

/// Wraps handler calls with request logging, timing and failure capture.
///
/// Created once at start-up and shared by every request. Holds no mutable
/// state, so concurrent calls need no locking.
#[derive(Clone)]
pub struct CallInterceptor {
    matcher: ScopeMatcher,
    extractor: MetadataExtractor,
    classifier: FailureClassifier,
    emitter: LogEmitter,
    policy: FailurePolicy,
}

impl CallInterceptor {
    /// Creates a new interceptor.
    pub fn new(config: &InterceptorConfig, capabilities: Capabilities) -> Self {
        Self {
            matcher: ScopeMatcher::from_config(config),
            extractor: MetadataExtractor::new(
                config,
                capabilities.request_context,
                capabilities.serializer,
            ),
            classifier: FailureClassifier::new(capabilities.stack_trace_formatter),
            emitter: LogEmitter::new(capabilities.log_sink, config.parameter_delimiter.clone()),
            policy: config.failure_policy,
        }
    }

    /// Runs `handler` inside the logging pipeline.
    ///
    /// Out-of-scope calls run the handler directly and log nothing. In-scope
    /// calls log the request metadata and parameters, time the handler, log a
    /// classified failure if it raised, and always end with exactly one
    /// completion line.
    ///
    /// Under [`FailurePolicy::MaskAndDefault`] a handler failure is swallowed
    /// and `T::default()` is returned, so the dispatcher sees a success.
    ///
    /// # Errors
    ///
    /// - `MissingRequestContext` when no request is active for this call.
    /// - `ParameterMismatch` when names and values differ in length; the
    ///   handler is not invoked.
    /// - `Handler` when the handler fails under `LogAndRethrow`, or fails
    ///   on an out-of-scope call.
    pub async fn intercept<T, E, F, Fut>(
        &self,
        type_name: &str,
        operation: &str,
        parameter_names: &[&str],
        arguments: &[ArgValue],
        handler: F,
    ) -> CallLogResult<T>
    where
        T: Default,
        E: Into<anyhow::Error>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.matcher.matches(type_name, operation) {
            return handler().await.map_err(|e| self.classifier.into_error(e));
        }

        let mut guard = CompletionGuard::new(&self.emitter, type_name, operation);

        let call = self
            .extractor
            .extract(type_name, operation, parameter_names, arguments)
            .map_err(|e| {
                self.emitter.aborted(&e);
                e
            })?;

        self.emitter.request(&call);
        self.emitter.parameters(&call);

        guard.begin(call);
        let timed = invoke_timed(handler).await;

        let (failure, cause) = match timed.outcome {
            Invocation::Returned(value) => {
                guard.finish(timed.started_at, timed.elapsed, None);
                return Ok(value);
            }
            Invocation::Raised(err) => self.classifier.classify(err),
            Invocation::Panicked(payload) => self.classifier.classify_panic(payload.as_ref()),
        };

        match self.policy {
            FailurePolicy::MaskAndDefault => {
                guard.finish(timed.started_at, timed.elapsed, Some(failure));
                Ok(T::default())
            }
            FailurePolicy::LogAndRethrow => {
                guard.finish(timed.started_at, timed.elapsed, Some(failure.clone()));
                drop(guard);
                Err(CallLogError::Handler { failure, cause })
            }
        }
    }
}

/// Emits the failure lines and the completion summary exactly once when dropped.
///
/// The summary is rendered from the tracked [`InterceptedCall`]. With no call
/// tracked, extraction failed and the summary carries only the target. A call
/// still invoking on drop means the interceptor future was abandoned while the
/// handler ran; that is recorded as a cancellation failure.
struct CompletionGuard<'a> {
    emitter: &'a LogEmitter,
    type_name: &'a str,
    operation: &'a str,
    call: Option<InterceptedCall>,
    invoking_since: Option<(DateTime<Utc>, Instant)>,
}

impl<'a> CompletionGuard<'a> {
    fn new(emitter: &'a LogEmitter, type_name: &'a str, operation: &'a str) -> Self {
        Self {
            emitter,
            type_name,
            operation,
            call: None,
            invoking_since: None,
        }
    }

    fn begin(&mut self, call: InterceptedCall) {
        self.call = Some(call);
        self.invoking_since = Some((Utc::now(), Instant::now()));
    }

    fn finish(
        &mut self,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        failure: Option<HandlerFailure>,
    ) {
        self.invoking_since = None;
        if let Some(call) = self.call.as_mut() {
            call.record_outcome(started_at, elapsed, failure);
        }
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if let Some((started_at, started)) = self.invoking_since.take() {
            self.finish(started_at, started.elapsed(), Some(cancellation_failure()));
        }

        match &self.call {
            Some(call) => self.emitter.finished(call),
            None => self
                .emitter
                .completion(self.type_name, self.operation, UNKNOWN_URL, None, Duration::ZERO),
        }
    }
}
