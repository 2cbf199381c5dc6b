use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use datachat::chat::{ChatBackend, SimulatedBackend};
use datachat::decode::Cell;
use datachat::{Config, PreviewResult, Previewer, UploadGate, UploadedFile};

/// Preview a tabular or document file, then optionally ask a question
/// about it through the simulated chat backend.
#[derive(Parser)]
#[command(name = "datachat", version)]
struct Cli {
    /// File to preview (.csv, .xlsx, .txt or .pdf)
    file: PathBuf,

    /// Question to ask about the file after previewing it
    #[arg(long)]
    ask: Option<String>,

    /// Emit the preview as JSON instead of a rendered table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datachat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let file = UploadedFile::from_path(&cli.file)
        .await
        .with_context(|| format!("cannot open {}", cli.file.display()))?;
    info!("selected {} ({} bytes)", file.name(), file.len());

    let gate = UploadGate::new();
    if let Err(err) = gate.accept(&file) {
        anyhow::bail!("{err}");
    }

    let previewer = Previewer::new(config.preview);
    previewer
        .select(file.clone())
        .await
        .context("preview task panicked")?;

    match previewer.state() {
        datachat::PreviewState::Ready(preview) if cli.json => render_json(&preview)?,
        datachat::PreviewState::Ready(preview) => render(&preview),
        datachat::PreviewState::Failed(err) => anyhow::bail!("{err}"),
        _ => unreachable!("pipeline completed without committing"),
    }

    if let Some(query) = cli.ask {
        let backend = SimulatedBackend::new(Duration::from_millis(config.chat.reply_delay_ms));
        let reply = backend.ask(&file, &query).await?;
        println!("\n> {query}\n{reply}");
    }

    Ok(())
}

fn render_json(preview: &PreviewResult) -> anyhow::Result<()> {
    let value = match preview {
        PreviewResult::DelimitedText { headers, rows } => {
            serde_json::json!({ "type": preview.format(), "headers": headers, "rows": rows })
        }
        PreviewResult::Spreadsheet { rows } => {
            serde_json::json!({ "type": preview.format(), "rows": rows })
        }
        PreviewResult::PlainText(text) => {
            serde_json::json!({ "type": preview.format(), "text": text })
        }
        PreviewResult::BinaryDocument { file_name, blob } => {
            serde_json::json!({ "type": preview.format(), "file_name": file_name, "blob": blob.id() })
        }
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn render(preview: &PreviewResult) {
    match preview {
        PreviewResult::DelimitedText { headers, rows } => {
            println!("{}", headers.join(" | "));
            for row in rows {
                let line: Vec<&str> = headers
                    .iter()
                    .map(|h| row.get(h).map(String::as_str).unwrap_or(""))
                    .collect();
                println!("{}", line.join(" | "));
            }
        }
        PreviewResult::Spreadsheet { rows } => {
            for row in rows {
                let line: Vec<String> = row.iter().map(Cell::to_string).collect();
                println!("{}", line.join(" | "));
            }
        }
        PreviewResult::PlainText(text) => println!("{text}"),
        PreviewResult::BinaryDocument { file_name, blob } => {
            println!("PDF Preview: {file_name} (embedded viewer reference {})", blob.id());
        }
    }
}
