use eyre::{Result, bail, eyre};
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::verbose;

static SENDER: OnceCell<mpsc::UnboundedSender<String>> = OnceCell::new();

pub struct ClipboardService;

impl ClipboardService {
    /// Own the system clipboard until `cancel_token` fires. The clipboard
    /// handle must outlive the copied text on some platforms, so it lives
    /// in this task.
    pub async fn start(cancel_token: CancellationToken) -> Result<()> {
        verbose!("[+] Initializing clipboard service");
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        SENDER
            .set(tx)
            .map_err(|_| eyre!("clipboard service is already running"))?;
        let mut clipboard = arboard::Clipboard::new()?;
        verbose!("[+] Clipboard service initialized");

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    log::debug!("Clipboard service cancelled");
                    return Ok(());
                }
                text = rx.recv() => {
                    let Some(text) = text else {
                        return Ok(());
                    };
                    if let Err(err) = clipboard.set_text(text) {
                        log::error!("Failed to write clipboard: {}", err);
                    }
                }
            }
        }
    }

    pub fn set(text: impl Into<String>) -> Result<()> {
        if let Some(tx) = SENDER.get() {
            tx.send(text.into())?;
            return Ok(());
        }

        bail!("clipboard service is not initialized")
    }
}
