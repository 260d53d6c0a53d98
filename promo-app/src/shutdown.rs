//! Turns SIGINT/SIGTERM into a cancellation of the poll loop.
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Install the signal handlers now and cancel `cancel` on the first signal.
///
/// Handlers are registered before this returns, so a signal that arrives
/// while the first tick is pending is not lost.
#[cfg(unix)]
pub fn spawn_signal_listener(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        };
        tracing::info!(signal = name, "shutdown.signal_received");
        cancel.cancel();
    }))
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(cancel: CancellationToken) -> std::io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!(signal = "ctrl-c", "shutdown.signal_received");
                cancel.cancel();
            }
            Err(e) => {
                tracing::warn!(error = %e, "shutdown.ctrl_c_unavailable");
            }
        }
    }))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn sigterm_cancels_the_token() {
        let cancel = CancellationToken::new();
        let listener = spawn_signal_listener(cancel.clone()).unwrap();

        // SAFETY: `raise` has no memory-safety preconditions; the handler above
        // replaces the default terminate action.
        assert_eq!(unsafe { libc::raise(libc::SIGTERM) }, 0);

        tokio::time::timeout(Duration::from_secs(5), cancel.cancelled())
            .await
            .expect("token cancelled after SIGTERM");
        listener.await.unwrap();
        assert!(cancel.is_cancelled());
    }
}
