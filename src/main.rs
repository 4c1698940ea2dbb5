use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use streamdoc::{
    Config, Document, Error, Rendered, Result, StreamingMessage, document_to_pdf,
    document_to_typst, parse_complete, settled_prefix,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "streamdoc")]
#[command(about = "Render assistant message text as a structured document")]
struct Cli {
    /// Input text file, or `-` for stdin
    input: PathBuf,

    /// Output file (defaults to stdout, or the input name with .pdf for PDF)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Presentation config file
    #[arg(short, long, default_value = "streamdoc.toml")]
    config: PathBuf,

    /// Feed the input through a streaming message chunk by chunk
    #[arg(long)]
    replay: bool,

    /// Bytes per chunk for --replay (overrides the config)
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Typst,
    Pdf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let text = read_input(&cli.input)?;
    let config = Config::load_or_default(&cli.config);

    let message = if cli.replay {
        let chunk_size = cli.chunk_size.unwrap_or(config.replay.chunk_size);
        replay(&text, chunk_size)
    } else {
        let mut message = StreamingMessage::new();
        message.push(&text);
        message.finish();
        message
    };
    let rendered = message.render();

    match cli.format {
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&rendered)?;
            json.push('\n');
            write_output(cli.output.as_deref(), json.as_bytes())
        }
        Format::Typst => {
            let markup = document_to_typst(&into_document(rendered), &config);
            write_output(cli.output.as_deref(), markup.as_bytes())
        }
        Format::Pdf => {
            let pdf = document_to_pdf(&into_document(rendered), &config)?;
            let output = cli.output.clone().unwrap_or_else(|| pdf_path(&cli.input));
            write_output(Some(&output), &pdf)?;
            println!("Created {}", output.display());
            Ok(())
        }
    }
}

/// Typeset output always goes through the block structure, even for prose.
fn into_document(rendered: Rendered<'_>) -> Document {
    match rendered {
        Rendered::Artifact { document } => document,
        Rendered::Prose { text } => {
            info!("message is prose, typesetting it as plain blocks");
            parse_complete(text)
        }
    }
}

/// Push `text` through a streaming message in `chunk_size` byte steps,
/// re-rendering after each one the way a chat transcript would.
fn replay(text: &str, chunk_size: usize) -> StreamingMessage {
    let chunk_size = chunk_size.max(1);
    let mut message = StreamingMessage::new();
    let mut previous = Document::default();
    let mut start = 0;
    let mut steps = 0;

    while start < text.len() {
        let mut end = (start + chunk_size).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        message.push(&text[start..end]);
        start = end;
        steps += 1;

        let current = match message.render() {
            Rendered::Artifact { document } => document,
            Rendered::Prose { .. } => Document::default(),
        };
        debug!(
            step = steps,
            bytes = end,
            blocks = current.len(),
            settled = settled_prefix(&previous, &current),
            "re-rendered"
        );
        previous = current;
    }

    message.finish();
    info!(steps, bytes = text.len(), "replay finished");
    message
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| Error::io("<stdin>", e))?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => fs::write(path, bytes).map_err(|e| Error::io(path, e)),
        None => io::stdout()
            .write_all(bytes)
            .map_err(|e| Error::io("<stdout>", e)),
    }
}

fn pdf_path(input: &Path) -> PathBuf {
    if input == Path::new("-") {
        PathBuf::from("message.pdf")
    } else {
        input.with_extension("pdf")
    }
}
