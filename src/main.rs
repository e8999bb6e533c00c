use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use picpaste::config::CliConfig;
use picpaste::panel::SettingField;
use picpaste::storage::JsonFileStorage;
use picpaste::{
    ClipboardFile, ClipboardItem, Editor, ImageUploadPlugin, PasteEvent, PasteListener, PasteOutcome,
    UploadClient, Workspace,
};

#[derive(Parser)]
#[command(name = "picpaste", version, about = "Upload pasted images and print a markdown reference")]
struct Cli {
    /// Settings file (defaults to ./data.json)
    #[arg(long, global = true, env = "PICPASTE_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Paste a file as if it came from the clipboard
    Paste {
        file: PathBuf,
        /// Clipboard type, guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },
    /// Show or edit settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
    },
}

/// Editor that writes inserted text to stdout.
struct StdoutEditor;

impl Editor for StdoutEditor {
    fn replace_selection(&self, text: &str) {
        println!("{}", text);
    }
}

#[derive(Default)]
struct CliWorkspace {
    paste_listeners: Vec<Arc<dyn PasteListener>>,
}

impl Workspace for CliWorkspace {
    fn on_editor_paste(&mut self, listener: Arc<dyn PasteListener>) {
        self.paste_listeners.push(listener);
    }
}

impl CliWorkspace {
    /// Outcome of the last registered listener.
    async fn paste(&self, event: &mut PasteEvent, editor: &dyn Editor) -> Option<PasteOutcome> {
        let mut outcome = None;
        for listener in &self.paste_listeners {
            outcome = Some(listener.on_paste(event, editor).await);
        }
        outcome
    }
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("txt" | "md") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn check_paste(outcome: Option<PasteOutcome>, file: &Path) -> anyhow::Result<()> {
    match outcome {
        Some(PasteOutcome::Inserted(_)) => Ok(()),
        Some(PasteOutcome::Ignored) | None => bail!("{} is not an image, nothing uploaded", file.display()),
        Some(PasteOutcome::NoPayload) => bail!("{} is empty, nothing uploaded", file.display()),
        Some(PasteOutcome::UploadFailed) => bail!("upload failed, see log for details"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    picpaste::logging::init_logging()?;

    let cli = Cli::parse();
    let mut config = CliConfig::from_env();
    if let Some(path) = cli.settings {
        config.settings_path = path;
    }
    tracing::debug!(path = %config.settings_path.display(), "using settings file");

    let storage = Arc::new(JsonFileStorage::new(config.settings_path.clone()));
    let client = UploadClient::with_timeout(config.http_timeout).context("building http client")?;
    let mut workspace = CliWorkspace::default();
    let plugin = ImageUploadPlugin::onload_with_client(storage, &mut workspace, client).await;

    match cli.command {
        Command::Paste { file, mime } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let mime = mime.unwrap_or_else(|| guess_mime(&file).to_string());
            // Unnamed files are sent as `image.<subtype>`.
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();

            let mut event = PasteEvent::new(vec![ClipboardItem::file(ClipboardFile::new(name, mime, bytes))]);
            let outcome = workspace.paste(&mut event, &StdoutEditor).await;
            check_paste(outcome, &file)?;
        }
        Command::Settings { action: SettingsAction::Show } => {
            let panel = plugin.settings_panel();
            println!("{}", panel.heading());
            for view in panel.display() {
                println!("{:<8} = {:?}  ({})", view.name, view.value, view.description);
            }
        }
        Command::Settings { action: SettingsAction::Set { api_url, api_key, user_id } } => {
            let panel = plugin.settings_panel();
            let edits = [
                (SettingField::ApiUrl, api_url),
                (SettingField::ApiKey, api_key),
                (SettingField::UserId, user_id),
            ];
            for (field, value) in edits {
                if let Some(value) = value {
                    panel
                        .on_change(field, &value)
                        .await
                        .with_context(|| format!("saving {}", field.name()))?;
                }
            }
            tracing::info!("settings saved to {}", config.settings_path.display());
        }
    }

    Ok(())
}
