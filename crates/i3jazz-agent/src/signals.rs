use i3jazz_common::protocol::Header;
use tokio::sync::watch;

use crate::producer::RunState;

/// Translates process signals into producer state changes.
///
/// Ctrl-C and SIGTERM request shutdown. The stop/continue signals declared in
/// the header pause and resume ticking; the default SIGSTOP cannot be caught
/// and is left to the OS.
pub async fn forward(header: Header, control: watch::Sender<RunState>) {
    imp::forward(header, control).await;
}

#[cfg(unix)]
mod imp {
    use super::*;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    fn listen(kind: SignalKind, purpose: &str) -> Option<Signal> {
        match signal(kind) {
            Ok(sig) => Some(sig),
            Err(e) => {
                tracing::debug!(signal = ?kind, purpose, error = %e, "Signal left to the OS");
                None
            }
        }
    }

    async fn recv(sig: &mut Option<Signal>) {
        match sig {
            Some(s) => {
                if s.recv().await.is_none() {
                    *sig = None;
                }
            }
            None => std::future::pending::<()>().await,
        }
    }

    pub(super) async fn forward(header: Header, control: watch::Sender<RunState>) {
        let mut terminate = listen(SignalKind::terminate(), "terminate");
        let mut stop = header
            .stop_signal
            .and_then(|n| listen(SignalKind::from_raw(n), "stop"));
        let mut cont = header
            .cont_signal
            .and_then(|n| listen(SignalKind::from_raw(n), "continue"));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                () = recv(&mut terminate) => break,
                () = recv(&mut stop) => {
                    tracing::debug!("Bar hidden, pausing collection");
                    control.send_replace(RunState::Paused);
                }
                () = recv(&mut cont) => {
                    tracing::debug!("Bar visible, resuming collection");
                    control.send_replace(RunState::Running);
                }
            }
        }

        tracing::info!("Shutting down gracefully");
        control.send_replace(RunState::Shutdown);
    }
}

#[cfg(not(unix))]
mod imp {
    use super::*;

    pub(super) async fn forward(_header: Header, control: watch::Sender<RunState>) {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down gracefully");
        control.send_replace(RunState::Shutdown);
    }
}
