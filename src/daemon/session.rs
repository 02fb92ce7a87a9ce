//! JSON-lines command session.

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::controller::WateringController;
use crate::error::Result;

/// Counts for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Lines dispatched to `do_command`
    pub commands: usize,
    /// Lines that were not a JSON object
    pub rejected: usize,
}

/// Read commands until EOF, answering each on `writer`.
///
/// Malformed lines get an `{"error": ...}` reply and do not end the session.
/// The controller is not closed here; that is the caller's job.
pub async fn run_session<R, W>(
    controller: &WateringController,
    mut reader: R,
    mut writer: W,
) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = SessionSummary::default();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Map<String, Value>>(trimmed) {
            Ok(command) => {
                debug!("Session command: {}", trimmed);
                summary.commands += 1;
                Value::Object(controller.do_command(&command).await)
            }
            Err(e) => {
                warn!("Rejected session line: {}", e);
                summary.rejected += 1;
                json!({ "error": format!("expected a JSON object of commands: {}", e) })
            }
        };

        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }

    Ok(summary)
}
