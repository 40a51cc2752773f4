//! Session worker thread: owns the tokio runtime and the session aggregate,
//! forwarding commands in and events out over crossbeam channels.

use crossbeam_channel::{Receiver, Sender};
use session_core::{SessionCommand, SessionConfig, SessionEvent, SessionHandle};
use tokio::sync::broadcast::error::RecvError;

pub fn launch(
    config: SessionConfig,
    cmd_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build session worker runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let handle = SessionHandle::spawn(config);
            let mut events = handle.subscribe_events();

            let forward_tx = event_tx.clone();
            let forwarder = tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(event) => {
                            let _ = forward_tx.try_send(event);
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "session event stream lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            while let Ok(command) = cmd_rx.recv() {
                if !handle.send(command) {
                    tracing::error!("session command queue closed; stopping worker");
                    break;
                }
            }

            handle.shutdown();
            forwarder.abort();
        });
    });
}
