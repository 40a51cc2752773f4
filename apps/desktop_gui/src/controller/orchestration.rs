//! Command orchestration from UI actions to the session worker queue.

use crossbeam_channel::{Sender, TrySendError};
use session_core::SessionCommand;

pub fn dispatch_session_command(
    cmd_tx: &Sender<SessionCommand>,
    cmd: SessionCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->session command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Session worker disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
        }
    }
}
