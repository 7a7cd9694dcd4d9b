//! # Cross-platform OS signal handling.
//!
//! Provides [`wait_for_shutdown_signal`], an async helper that completes when the process
//! receives a termination signal, and [`graceful_context`], a root [`Context`] that is
//! cancelled at that moment. Pass the latter to [`Group::run`](crate::Group::run) to stop
//! all actors on Ctrl-C / SIGTERM.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGHUP` (controlling terminal closed)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use tracing::{info, warn};

use crate::context::Context;

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sighup.recv()  => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call creates independent signal listeners.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Returns a root context that is cancelled when a termination signal arrives.
///
/// Must be called inside a Tokio runtime: a background task waits for the signal.
/// If signal registration fails the context is never cancelled by a signal and a
/// warning is logged.
pub fn graceful_context() -> Context {
    let ctx = Context::background();
    let handle = ctx.clone();

    tokio::spawn(async move {
        tokio::select! {
            res = wait_for_shutdown_signal() => match res {
                Ok(()) => {
                    info!("receive stop signal");
                    handle.cancel();
                }
                Err(err) => warn!(error = %err, "could not listen for stop signals"),
            },
            _ = handle.done() => {}
        }
    });
    ctx
}
