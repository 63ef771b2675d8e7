//! OS capability adapters: clipboard, URL opener, line-fed camera, prompts.

use std::io::{BufRead, Write};
use std::process::Command;
use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use padlink_canvas::{RecoveryChoice, RecoveryPrompt};
use padlink_scan::{CameraError, DecodeAttempt, DecodeCamera, ScanConfig};
use padlink_ui::{CapabilityError, Clipboard, UrlOpener};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use url::{Host, Url};

/// Question asked when a cached drawing exists at startup.
pub const RECOVERY_QUESTION: &str =
    "Unsaved changes detected, do you want to clear and sync the local canvas size?";

/// Returns `true` for HTTPS servers and loopback hosts, where clipboard
/// access is allowed.
pub fn is_secure_context(base: &Url) -> bool {
    if base.scheme() == "https" {
        return true;
    }
    match base.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(address)) => address.is_loopback(),
        Some(Host::Ipv6(address)) => address.is_loopback(),
        None => false,
    }
}

/// OS clipboard through `arboard`, refused outside a secure context.
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    secure_context: bool,
}

impl SystemClipboard {
    /// Clipboard for a session talking to `base`.
    pub fn for_server(base: &Url) -> Self {
        Self {
            secure_context: is_secure_context(base),
        }
    }

    fn open(&self) -> Result<arboard::Clipboard, CapabilityError> {
        if !self.secure_context {
            return Err(CapabilityError::Unavailable(
                "clipboard requires https or a loopback server".to_string(),
            ));
        }
        arboard::Clipboard::new().map_err(|error| CapabilityError::Unavailable(error.to_string()))
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        self.open()?
            .set_text(text.to_string())
            .map_err(|error| CapabilityError::Failed(error.to_string()))
    }

    async fn read_text(&self) -> Result<String, CapabilityError> {
        self.open()?.get_text().map_err(|error| match error {
            arboard::Error::ContentNotAvailable => {
                CapabilityError::Failed("clipboard holds no text".to_string())
            }
            other => CapabilityError::Failed(other.to_string()),
        })
    }
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandOpener;

impl UrlOpener for CommandOpener {
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        let mut command = if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]);
            command
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else {
            Command::new("xdg-open")
        };

        command
            .arg(url)
            .spawn()
            .map(|_| ())
            .map_err(|error| CapabilityError::Unavailable(error.to_string()))
    }
}

type LineSource = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

/// Camera fed by an external decoder writing one decoded code per line.
///
/// Blank lines count as frames without a code. End of input closes the
/// decode stream.
pub struct LineDecodeCamera {
    lines: Arc<Mutex<LineSource>>,
}

impl LineDecodeCamera {
    /// Camera reading standard input.
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    /// Camera reading any buffered source.
    pub fn from_reader(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let boxed: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
        Self {
            lines: Arc::new(Mutex::new(boxed.lines())),
        }
    }
}

#[async_trait]
impl DecodeCamera for LineDecodeCamera {
    async fn start(
        &self,
        config: &ScanConfig,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<DecodeAttempt>, CameraError> {
        info!(
            "decoder input attached facing={:?} fps={} region={}",
            config.facing, config.fps, config.region_size
        );
        let capacity = usize::try_from(config.fps.max(1)).unwrap_or(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let lines = Arc::clone(&self.lines);

        tokio::spawn(async move {
            let mut lines = lines.lock().await;
            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    line = lines.next_line() => line,
                };
                let attempt = match next {
                    Ok(Some(line)) => {
                        let line = line.trim_end_matches('\r');
                        if line.trim().is_empty() {
                            DecodeAttempt::Miss
                        } else {
                            DecodeAttempt::Decoded(line.to_string())
                        }
                    }
                    Ok(None) => break,
                    Err(error) => {
                        warn!("decoder input failed: {error}");
                        break;
                    }
                };
                if sender.send(attempt).await.is_err() {
                    break;
                }
            }
        });

        Ok(receiver)
    }

    async fn stop(&self) -> Result<(), CameraError> {
        Ok(())
    }
}

/// Asks the recovery question on the terminal; only `y`/`yes` discards.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl RecoveryPrompt for TerminalPrompt {
    fn choose(&self) -> RecoveryChoice {
        eprint!("{RECOVERY_QUESTION} [y/N] ");
        if let Err(error) = std::io::stderr().flush() {
            warn!("prompt flush failed: {error}");
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => recovery_choice_from_answer(&answer),
            Err(error) => {
                warn!("prompt read failed, restoring cached drawing: {error}");
                RecoveryChoice::Restore
            }
        }
    }
}

/// Interprets a terminal answer to [`RECOVERY_QUESTION`].
pub fn recovery_choice_from_answer(answer: &str) -> RecoveryChoice {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => RecoveryChoice::DiscardAndSync,
        _ => RecoveryChoice::Restore,
    }
}
