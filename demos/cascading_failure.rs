//! # Example: Cascading failure
//!
//! `s2` fails after one second; `s1` and `s3` are stopped without an explicit
//! `stop_all`, and `service_errors` reports only `s2`.
//!
//! ```bash
//! cargo run --example cascading_failure
//! ```

use std::{sync::Arc, time::Duration};

use servisor::{Container, ContainerConfig, LogWriter, ServiceBuilder, ServiceError};
use tokio_util::sync::CancellationToken;

fn until_cancelled(name: &'static str) -> ServiceBuilder {
    ServiceBuilder::new(name).run(move |ctx: CancellationToken| async move {
        ctx.cancelled().await;
        println!("[{name}] cancelled, exiting");
        Ok::<(), ServiceError>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let container = Container::builder(ContainerConfig::default())
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    until_cancelled("s1").register(&container)?;
    ServiceBuilder::new("s2")
        .run(|_ctx: CancellationToken| async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Err::<(), _>(ServiceError::fail("boom"))
        })
        .register(&container)?;
    until_cancelled("s3").register(&container)?;

    container.start_all(&CancellationToken::new()).await?;
    let outcome = container.wait_all_stopped(Some(Duration::from_secs(5))).await?;

    println!("outcome: {outcome:?}");
    for (name, err) in container.service_errors() {
        println!("{name}: {err}");
    }
    Ok(())
}
