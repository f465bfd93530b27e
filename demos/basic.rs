//! # Example: Basic container
//!
//! Two services with init hooks, run until Ctrl-C (or 3 seconds), then stop.
//!
//! ```bash
//! RUST_LOG=info cargo run --example basic
//! ```

use std::{sync::Arc, time::Duration};

use servisor::{
    Container, ContainerConfig, LogWriter, ServiceBuilder, ServiceError, WaitOutcome, shutdown,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = ContainerConfig {
        wait_timeout: Duration::from_secs(5),
        ..ContainerConfig::default()
    };
    let container = Container::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    ServiceBuilder::new("database")
        .init(|_ctx: CancellationToken| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            println!("[database] connected");
            Ok::<(), ServiceError>(())
        })
        .run(|ctx: CancellationToken| async move {
            ctx.cancelled().await;
            println!("[database] closing pool");
            Ok::<(), ServiceError>(())
        })
        .register(&container)?;

    ServiceBuilder::new("ticker")
        .run(|ctx: CancellationToken| async move {
            let mut n = 0u64;
            while !ctx.is_cancelled() {
                n += 1;
                println!("[ticker] tick {n}");
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(500)) => {}
                    _ = ctx.cancelled() => {}
                }
            }
            Ok::<(), ServiceError>(())
        })
        .register(&container)?;

    let parent = CancellationToken::new();
    let _signals = shutdown::cancel_on_shutdown_signal(parent.clone());
    {
        let parent = parent.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            parent.cancel();
        });
    }

    container.start_all(&parent).await?;
    parent.cancelled().await;

    match container.stop_and_wait_default().await? {
        WaitOutcome::AllStopped => println!("all services stopped"),
        WaitOutcome::TimedOut { stuck } => println!("still running: {stuck:?}"),
    }
    Ok(())
}
