//! `padlink` command-line client for the file relay server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{LevelFilter, info, warn};
use padlink_app::{
    CommandOpener, HttpRelay, LineDecodeCamera, RelayConfig, SystemClipboard, TerminalPrompt,
    app_version, init_logging, mime_for_path, parse_strokes,
};
use padlink_canvas::{
    CanvasEngine, CanvasSizeSource, FileSnapshotStore, RecoveryChoice, RecoveryPrompt,
};
use padlink_core::UploadOutcome;
use padlink_files::{FileBrowser, FsDownloadSink};
use padlink_scan::{SCAN_PREFIX, ScanEngine};
use padlink_ui::{ActionBar, PhotoSelection, SelectedPhoto, TEXT_PREFIX, TextCapture};
use padlink_upload::UploadClient;

#[derive(Debug, Parser)]
#[command(name = "padlink", version = app_version(), about = "Send drawings, scans, text and photos to a relay server")]
struct Cli {
    /// Config file (defaults to <config_dir>/padlink/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Relay server base URL.
    #[arg(long, global = true)]
    server: Option<String>,
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the server canvas size.
    Size,
    /// Capture text and push it.
    Text {
        /// Text to capture.
        value: String,
        /// Copy the text to the clipboard.
        #[arg(long)]
        copy: bool,
        /// Open the text when it is a web address.
        #[arg(long)]
        open: bool,
        /// Skip the upload.
        #[arg(long)]
        no_push: bool,
    },
    /// Paste the clipboard into an empty buffer and push it.
    Paste,
    /// Send photos in one request.
    Photos {
        /// Files to send.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Replay a drawing and push it.
    Sign {
        /// JSON file with pointer events.
        #[arg(long)]
        strokes: PathBuf,
        /// Restore a cached drawing without asking.
        #[arg(long, conflicts_with = "discard")]
        restore: bool,
        /// Discard a cached drawing without asking.
        #[arg(long)]
        discard: bool,
    },
    /// Scan one code from decoder lines on stdin.
    Scan {
        /// Open the result when it is a web address.
        #[arg(long)]
        open: bool,
        /// Copy the result to the clipboard.
        #[arg(long)]
        copy: bool,
        /// Skip the upload.
        #[arg(long)]
        no_push: bool,
    },
    /// List files shared by the server.
    List,
    /// Download shared files.
    Download {
        /// Names as shown by `list` (name plus extension).
        #[arg(required_unless_present = "all")]
        names: Vec<String>,
        /// Download every listed file.
        #[arg(long, conflicts_with = "names")]
        all: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = RelayConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(server) = cli.server.clone() {
        config.server_url = server;
        config.validate().context("validating --server")?;
    }
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level_filter()?
    };
    init_logging(level)?;
    info!("padlink {} server={}", app_version(), config.server_url);

    let relay = HttpRelay::from_config(&config)?;
    let uploader = UploadClient::new(Arc::new(relay.clone()));

    match cli.command {
        Command::Size => {
            let size = relay.fetch_canvas_size().await?;
            println!("{}x{}", size.width, size.height);
        }
        Command::Text {
            value,
            copy,
            open,
            no_push,
        } => {
            let mut capture = TextCapture::new(action_bar(&relay, uploader, TEXT_PREFIX));
            capture.input(value);
            run_actions(capture.bar_mut(), copy, open, !no_push).await?;
        }
        Command::Paste => {
            let mut capture = TextCapture::new(action_bar(&relay, uploader, TEXT_PREFIX));
            if capture.paste().await.is_err() {
                bail!("{}", capture.bar().status().text());
            }
            run_actions(capture.bar_mut(), false, false, true).await?;
        }
        Command::Photos { paths } => send_photos(uploader, paths).await?,
        Command::Sign {
            strokes,
            restore,
            discard,
        } => sign(&config, relay, uploader, strokes, restore, discard).await?,
        Command::Scan {
            open,
            copy,
            no_push,
        } => {
            let bar = action_bar(&relay, uploader, SCAN_PREFIX);
            let mut engine = ScanEngine::new(bar, Arc::new(LineDecodeCamera::stdin()), config.scan);
            let decoded = engine.scan_once().await;
            println!("{}", engine.bar().status().text());
            if decoded.is_none() {
                if !engine.result_text().is_empty() {
                    println!("{}", engine.result_text());
                }
                bail!("no code decoded");
            }
            println!("{}", engine.result_text());
            run_actions(engine.bar_mut(), copy, open, !no_push).await?;
        }
        Command::List => {
            let mut browser = FileBrowser::new(Arc::new(relay));
            let files = browser.refresh().await?;
            for file in files {
                println!(
                    "{}\t{}\t{}\t{}",
                    file.name,
                    file.ext,
                    file.size,
                    file.modified_display()
                );
            }
        }
        Command::Download { names, all } => {
            let mut browser = FileBrowser::new(Arc::new(relay));
            browser.refresh().await?;
            if all {
                browser.select_all();
            } else {
                for name in &names {
                    if !browser.set_selected(name, true) {
                        warn!("{name} is not in the shared file list");
                    }
                }
            }
            let report = browser
                .download_selected(&FsDownloadSink::new(&config.download_dir))
                .await
                .with_context(|| browser.status().text().to_string())?;
            for path in &report.saved {
                println!("{}", path.display());
            }
            println!("{}", browser.status().text());
            if !report.failed.is_empty() {
                bail!("{} download(s) failed", report.failed.len());
            }
        }
    }

    Ok(())
}

fn action_bar(relay: &HttpRelay, uploader: UploadClient, prefix: &str) -> ActionBar {
    ActionBar::new(
        prefix,
        uploader,
        Arc::new(SystemClipboard::for_server(relay.base())),
        Arc::new(CommandOpener),
    )
}

async fn run_actions(bar: &mut ActionBar, copy: bool, open: bool, push: bool) -> Result<()> {
    if !bar.is_armed() {
        bail!("nothing to send");
    }
    if copy {
        bar.copy().await;
        println!("{}", bar.status().text());
    }
    if open && !bar.open() {
        warn!("payload is not an openable address");
    }
    if push {
        let outcome = bar.push().await;
        println!("{}", bar.status().text());
        ensure_saved(outcome.as_ref())?;
    }
    Ok(())
}

async fn send_photos(uploader: UploadClient, paths: Vec<PathBuf>) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", path.display()))?;
        files.push(SelectedPhoto {
            mime: mime_for_path(&path).to_string(),
            name,
            bytes,
        });
    }

    let mut selection = PhotoSelection::new(uploader);
    selection.select(files);
    let outcome = selection.send().await;
    println!("{}", selection.status().text());
    ensure_saved(outcome.as_ref())
}

async fn sign(
    config: &RelayConfig,
    relay: HttpRelay,
    uploader: UploadClient,
    strokes: PathBuf,
    restore: bool,
    discard: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(&strokes)
        .with_context(|| format!("reading {}", strokes.display()))?;
    let script = parse_strokes(&raw)?;

    let mut engine = CanvasEngine::new(
        config.initial_canvas,
        Arc::new(relay),
        Arc::new(FileSnapshotStore::new(&config.cache_dir)),
        uploader,
    );
    let prompt: Box<dyn RecoveryPrompt> = if restore {
        Box::new(RecoveryChoice::Restore)
    } else if discard {
        Box::new(RecoveryChoice::DiscardAndSync)
    } else {
        Box::new(TerminalPrompt)
    };
    let startup = engine.start(prompt.as_ref()).await;
    info!("drawing startup {startup:?}");

    if let Some(display) = script.display {
        engine.set_display(display.into());
    }
    for step in script.events {
        engine.handle(step.to_event());
    }

    let outcome = engine.push().await;
    println!("{}", engine.status().text());
    ensure_saved(Some(&outcome))
}

fn ensure_saved(outcome: Option<&UploadOutcome>) -> Result<()> {
    match outcome {
        Some(outcome) if outcome.is_success() => Ok(()),
        Some(outcome) => bail!("{}", outcome.status_text()),
        None => bail!("nothing to send"),
    }
}
