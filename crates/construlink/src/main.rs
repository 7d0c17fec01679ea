//! Command-line access to the daily report (RDO).
//!
//! A draft is built from an optional JSON file, then every `--set` and then
//! every `--add` is dispatched through the same reducer the form uses.
//!
//! # Examples
//!
//! ```sh
//! # Completion percentage of a saved draft
//! rdo progress --draft rdo.json
//!
//! # HTML document, with a couple of edits
//! rdo render --set empresa=ACME --set dataRelatorio=07/11/2024 --add "efetivo=Ana;Pedreiro;8"
//!
//! # Send to the PDF renderer and save the result
//! rdo export --draft rdo.json --endpoint http://localhost:3001/pdfgenerator/generate
//!
//! # Store a session token
//! rdo login --token abc --remember-me
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use construlink::prelude::*;
use construlink::progress::{TOTAL_FIELDS, filled_fields};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Daily construction report tools.
#[derive(Parser)]
#[command(name = "rdo", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the report's HTML document.
    Render {
        #[command(flatten)]
        draft: DraftArgs,
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the completion percentage.
    Progress {
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Render the report to PDF through the remote renderer.
    Export {
        #[command(flatten)]
        draft: DraftArgs,
        /// Renderer URL. Falls back to CONSTRULINK_PDF_URL, then the default.
        #[arg(long)]
        endpoint: Option<String>,
        /// Directory for generated PDFs.
        #[arg(long, default_value = "./rdo-output")]
        out_dir: PathBuf,
        /// Request timeout in seconds.
        #[arg(long, default_value_t = 120)]
        timeout: u64,
    },
    /// Store a session token.
    Login {
        #[arg(long)]
        token: String,
        /// Keep the session across restarts.
        #[arg(long)]
        remember_me: bool,
        #[command(flatten)]
        storage: StorageArgs,
    },
    /// Show the stored session token.
    Whoami {
        #[command(flatten)]
        storage: StorageArgs,
    },
}

#[derive(Args)]
struct DraftArgs {
    /// JSON draft to start from.
    #[arg(long)]
    draft: Option<PathBuf>,
    /// Replace a field: `key=value` (repeatable).
    #[arg(long = "set", value_name = "KEY=VALUE")]
    sets: Vec<String>,
    /// Append a list entry: `efetivo=nome;cargo;horas`,
    /// `equipamentos=nome;quantidade;condicao` or `fotosProgresso=path`
    /// (repeatable).
    #[arg(long = "add", value_name = "KEY=VALUE")]
    adds: Vec<String>,
}

#[derive(Args)]
struct StorageArgs {
    /// Token storage file.
    #[arg(long, default_value = "./.construlink/storage.json")]
    storage: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Render { draft, out } => {
            let store = draft.build()?;
            let html = render_html(store.state());
            match out {
                Some(path) => {
                    std::fs::write(&path, html)
                        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
                    info!("HTML written to {}", path.display());
                }
                None => print!("{html}"),
            }
        }
        Command::Progress { draft } => {
            let store = draft.build()?;
            println!(
                "{:.2}% ({}/{} fields)",
                store.progress(),
                filled_fields(store.state()),
                TOTAL_FIELDS
            );
        }
        Command::Export {
            draft,
            endpoint,
            out_dir,
            timeout,
        } => {
            let config = AppConfig::default()
                .with_output_dir(out_dir)
                .with_request_timeout(Duration::from_secs(timeout))
                .resolve_endpoint(endpoint);
            let client = PdfGeneratorClient::from_config(&config).map_err(|e| e.to_string())?;
            let artifacts = Arc::new(ArtifactStore::new(&config.output_dir));
            let mut session = FormSession::with_store(draft.build()?, artifacts);

            match session.submit(&client).await {
                Ok(outcome) => {
                    println!("{}", outcome.notice.text());
                    println!("{}", outcome.artifact.url);
                }
                Err(e) => {
                    eprintln!("{}", e.notice().text());
                    return Err(e.to_string());
                }
            }
        }
        Command::Login {
            token,
            remember_me,
            storage,
        } => {
            let mut store = storage.open()?;
            store
                .set_token(&token, remember_me)
                .map_err(|e| e.to_string())?;
            info!("Token stored in {}", store.storage().path().display());
        }
        Command::Whoami { storage } => {
            let store = storage.open()?;
            match store.token() {
                Some(token) => println!("token: {token} (remember me: {})", store.remember_me()),
                None => println!("not logged in"),
            }
        }
    }
    Ok(())
}

impl DraftArgs {
    /// Load the starting draft and apply the edits.
    fn build(&self) -> Result<FormStore, String> {
        let draft = match &self.draft {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
                ReportDraft::from_json(&json)
                    .map_err(|e| format!("invalid draft {}: {e}", path.display()))?
            }
            None => ReportDraft::new(),
        };
        let mut store = FormStore::from_draft(draft);

        for raw in &self.sets {
            let (key, value) = split_assignment(raw)?;
            store.dispatch(FormAction::set_from_str(key, value).map_err(|e| e.to_string())?);
        }
        for raw in &self.adds {
            let (key, value) = split_assignment(raw)?;
            store.dispatch(FormAction::add_from_str(key, value).map_err(|e| e.to_string())?);
        }
        Ok(store)
    }
}

impl StorageArgs {
    fn open(&self) -> Result<TokenStore<FileStorage>, String> {
        FileStorage::open(&self.storage)
            .map(TokenStore::new)
            .map_err(|e| e.to_string())
    }
}

fn split_assignment(raw: &str) -> Result<(&str, &str), String> {
    raw.split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}
