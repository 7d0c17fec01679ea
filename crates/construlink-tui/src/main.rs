//! Interactive ConstruLink terminal app.
//!
//! Opens the dashboard; the daily report form is one card away. PDFs are
//! rendered by the remote service and written to `--out-dir`.
//!
//! ```sh
//! construlink --endpoint http://localhost:3001/pdfgenerator/generate --start /form
//! ```

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use construlink::prelude::*;
use construlink::ui::tracing::UiTracingLayer;
use construlink::ui::{UiState, drive_exports};
use construlink_tui::{TuiConfig, spawn_tui};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// ConstruLink daily construction report.
#[derive(Parser)]
#[command(name = "construlink", version)]
struct Cli {
    /// PDF renderer URL. Falls back to CONSTRULINK_PDF_URL, then the default.
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory for generated PDFs.
    #[arg(long, default_value = "./rdo-output")]
    out_dir: PathBuf,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Screen to open first (`/home`, `/select`, `/notification`,
    /// `/profile`, `/form`).
    #[arg(long, default_value = "/home")]
    start: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(start) = Route::from_path(&cli.start) else {
        eprintln!("Error: unknown screen '{}'", cli.start);
        std::process::exit(1);
    };

    let config = AppConfig::default()
        .with_output_dir(cli.out_dir)
        .with_request_timeout(Duration::from_secs(cli.timeout))
        .resolve_endpoint(cli.endpoint);

    let client = match PdfGeneratorClient::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // UI state shared between the export driver and the TUI.
    let mut initial = UiState::new(Arc::new(ArtifactStore::new(&config.output_dir)));
    initial.navigate(start);
    let ui_state = Arc::new(Mutex::new(initial));

    // Tracing → TUI log buffer. Debug and above; the log pane hides debug.
    let (tracing_layer, log_buffer) = UiTracingLayer::new();
    tracing_subscriber::registry()
        .with(LevelFilter::DEBUG)
        .with(tracing_layer)
        .init();
    info!("PDF endpoint: {}", client.endpoint());

    let tui_handle = spawn_tui(
        ui_state.clone(),
        TuiConfig {
            log_buffer: Some(log_buffer),
        },
    );

    drive_exports(ui_state.clone(), &client).await;

    if let Ok(mut s) = ui_state.lock() {
        s.running = false;
    }
    tui_handle.join().ok();
}
