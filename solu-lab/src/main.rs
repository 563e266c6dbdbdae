use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use solu_core::{current_trace_context, fork, merge_trace, traceparent_value, TraceContext};
use solu_log::{global, Field};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solu_lab=debug,solu_log=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting solu lab");

    let handle = PrometheusBuilder::new().install_recorder()?;
    solu_log::describe_metrics();

    let config = config::Config::load()?;
    tracing::info!(workers = config.workers, requests = config.requests, "Configuration loaded");

    let logger = config.log.build()?;
    global::init(logger)?;
    let logger = global::logger().named("lab");

    let mut tasks = Vec::with_capacity(config.workers);
    for worker in 0..config.workers {
        let requests = config.requests;
        let logger = logger.with([Field::uint("worker", worker as u64)]);
        tasks.push(tokio::spawn(async move {
            for request in 0..requests {
                let ctx = fork(&TraceContext::new());
                solu_core::with_trace_context(ctx, handle_request(logger.clone(), request)).await;
            }
        }));
    }
    for task in tasks {
        task.await?;
    }

    logger.sync()?;
    tracing::info!("Simulation finished");

    println!("{}", handle.render());
    Ok(())
}

/// One inbound request: logs under the task's trace, then calls a downstream
/// service through the carrier header.
async fn handle_request(logger: solu_log::Logger, request: usize) {
    let started = Instant::now();
    let ctx = current_trace_context();
    let log = logger.in_context(&ctx);
    log.info_with("request received", &[Field::uint("request", request as u64)]);

    let carrier = traceparent_value(&fork(&ctx));
    downstream(&logger, &carrier).await;

    solu_log::infof!(log, "request {} done", request);
    log.debug_with("request timing", &[Field::duration("elapsed", started.elapsed())]);
}

async fn downstream(logger: &solu_log::Logger, carrier: &str) {
    let ctx = merge_trace(&TraceContext::new(), carrier);
    let log = logger.named("downstream").in_context(&ctx);

    tokio::time::sleep(Duration::from_millis(5)).await;
    log.info_with("downstream call", &[Field::str("traceparent", carrier)]);
}
