//! Task-scoped trace context.
//!
//! Passing [`TraceContext`] by value is the primary way to propagate ids. For
//! code paths where threading a parameter is impractical, a context can be
//! installed for the duration of a future and read back from anywhere inside it.

use crate::context::TraceContext;
use std::future::Future;
use tokio::task_local;

task_local! {
    static TRACE_CONTEXT: TraceContext;
}

/// Context installed for the current task, or the empty context outside a scope.
pub fn current_trace_context() -> TraceContext {
    TRACE_CONTEXT.try_with(|ctx| *ctx).unwrap_or_default()
}

/// Run `fut` with `ctx` installed as the task's trace context.
pub async fn with_trace_context<F>(ctx: TraceContext, fut: F) -> F::Output
where
    F: Future,
{
    TRACE_CONTEXT.scope(ctx, fut).await
}

/// Run a synchronous closure with `ctx` installed.
pub fn sync_with_trace_context<R>(ctx: TraceContext, f: impl FnOnce() -> R) -> R {
    TRACE_CONTEXT.sync_scope(ctx, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_scope_is_empty() {
        assert!(current_trace_context().is_empty());
    }

    #[tokio::test]
    async fn test_scope_propagates_through_awaits() {
        let ctx = TraceContext::new().fork();

        let seen = with_trace_context(ctx, async {
            tokio::task::yield_now().await;
            current_trace_context()
        })
        .await;

        assert_eq!(seen, ctx);
        assert!(current_trace_context().is_empty());
    }

    #[test]
    fn test_nested_sync_scope_shadows_outer() {
        let outer = TraceContext::new().trace();
        let inner = outer.fork();

        sync_with_trace_context(outer, || {
            assert_eq!(current_trace_context(), outer);
            sync_with_trace_context(inner, || {
                assert_eq!(current_trace_context(), inner);
            });
            assert_eq!(current_trace_context(), outer);
        });
    }
}
