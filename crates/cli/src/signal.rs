//! Signal handling for cooperative cancellation.
//!
//! A termination signal does not kill the process: it sets the run's
//! [`CancelFlag`], so no manifest write starts afterwards and the run ends
//! with a failing report.

use tokio::signal;
use tracing::warn;

use modfix_lib::cancel::CancelFlag;

/// Wait for SIGTERM, SIGINT, SIGHUP or Ctrl+C.
async fn wait_for_signal() {
  #[cfg(unix)]
  {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
      Ok(s) => s,
      Err(e) => {
        warn!("Failed to register SIGTERM handler: {}", e);
        ctrl_c().await;
        return;
      }
    };

    let mut sighup = match signal(SignalKind::hangup()) {
      Ok(s) => s,
      Err(e) => {
        warn!("Failed to register SIGHUP handler: {}", e);
        ctrl_c().await;
        return;
      }
    };

    tokio::select! {
      _ = sigterm.recv() => warn!("Received SIGTERM, stopping before the next write"),
      _ = sighup.recv() => warn!("Received SIGHUP, stopping before the next write"),
      _ = ctrl_c() => warn!("Received SIGINT, stopping before the next write"),
    }
  }

  #[cfg(not(unix))]
  {
    ctrl_c().await;
    warn!("Received Ctrl+C, stopping before the next write");
  }
}

/// Resolve on Ctrl+C. Never resolves if the listener cannot be installed.
async fn ctrl_c() {
  if let Err(e) = signal::ctrl_c().await {
    warn!("Failed to listen for Ctrl+C: {}", e);
    std::future::pending::<()>().await;
  }
}

/// Set `cancel` once a termination signal arrives.
pub async fn cancel_on_signal(cancel: CancelFlag) {
  wait_for_signal().await;
  cancel.cancel();
}
