//! # Example: first_failure
//!
//! Three closure actors; the first one to fail decides the result and the others
//! are stopped within the shutdown timeout.
//!
//! ## Run
//! ```bash
//! cargo run --example first_failure
//! ```

use std::time::Duration;

use actorgroup::{ActorError, Context, Event, EventKind, Group};

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("server closed")]
struct ServerClosed;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== first_failure example ===\n");

    let mut group = Group::builder()
        .with_shutdown_timeout(Duration::from_millis(500))
        .with_ignore_errors([actorgroup::IgnoreRule::error(ServerClosed)])
        .build();

    for (name, after) in [("fast", 300u64), ("slow", 900), ("slowest", 1500)] {
        group.add_named(
            name,
            move |ctx: Context| async move {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(after)) => {
                        Err(ActorError::failed(format!("worker gave up after {after}ms")))
                    }
                    _ = ctx.done() => Err(ctx.err().unwrap_or_default().into()),
                }
            },
            move |_ctx: Context| async move {
                println!("[{name}] shutdown requested");
            },
        );
    }

    let mut events = group.events();
    let printer = tokio::spawn(async move {
        while let Ok(ev) = events.recv().await {
            print_event(&ev);
            if ev.kind == EventKind::GroupStopped {
                break;
            }
        }
    });

    let res = group.run(Context::background()).await;
    printer.await?;

    match res {
        Ok(()) => println!("\ngroup finished cleanly"),
        Err(err) => println!("\ngroup finished with: {err}"),
    }
    Ok(())
}

fn print_event(ev: &Event) {
    let actor = ev.actor.as_deref().unwrap_or("-");
    let reason = ev.reason.as_deref().unwrap_or("");
    println!("[{:?}] actor={actor} {reason}", ev.kind);
}
