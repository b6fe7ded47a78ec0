use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parking_lot::Mutex;

use sensory::config::Config;
use sensory::stream::{FileStream, StreamValue};
use sensory::value::{DetachedContext, SharedProducer, Value};

#[derive(Parser, Debug)]
#[command(name = "sensory", version, about = "Files and terminals as line streams")]
struct Cli {
    /// Config file (default: ~/.config/sensory/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every line of a file:/// stream
    Read { uri: String },
    /// Append one line of text to a file:/// stream
    Write {
        uri: String,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Drain one file:/// stream into another
    Copy { from: String, to: String },
    /// Open a terminal emulator and echo back every line typed into it
    Terminal,
}

fn main() -> Result<()> {
    sensory::logging::init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    match cli.command {
        Command::Read { uri } => read(&config, &uri),
        Command::Write { uri, text } => write(&config, &uri, text),
        Command::Copy { from, to } => copy(&config, &from, &to),
        Command::Terminal => terminal(&config),
    }
}

fn read(config: &Config, uri: &str) -> Result<()> {
    let stream = FileStream::open_with(uri, &config.streams)
        .with_context(|| format!("failed to open {uri}"))?;
    let mut stream = scopeguard::guard(stream, |mut stream| stream.halt());

    // First update echoes the locator.
    stream.update()?;
    tracing::info!(uri, "Stream ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    loop {
        stream.update()?;
        let Some(line) = stream.value().first().and_then(Value::name) else {
            break;
        };
        out.write_all(line.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn write(config: &Config, uri: &str, text: Vec<String>) -> Result<()> {
    let stream = FileStream::open_with(uri, &config.streams)
        .with_context(|| format!("failed to open {uri}"))?;
    let mut stream = scopeguard::guard(stream, |mut stream| stream.halt());

    let line = Value::strings([text.join(" "), "\n".to_string()]);
    stream
        .write(&mut DetachedContext, false, line.into())
        .with_context(|| format!("failed to write to {uri}"))?;
    Ok(())
}

fn copy(config: &Config, from: &str, to: &str) -> Result<()> {
    let source = FileStream::open_with(from, &config.streams)
        .with_context(|| format!("failed to open {from}"))?;
    let target = FileStream::open_with(to, &config.streams)
        .with_context(|| format!("failed to open {to}"))?;
    let mut target = scopeguard::guard(target, |mut target| target.halt());

    let source = Arc::new(Mutex::new(source));
    let _halt_source = scopeguard::guard(Arc::clone(&source), |source| source.lock().halt());

    // Skip the locator echo so only file content is copied.
    source.lock().update()?;

    let content = Value::Stream(SharedProducer::from_shared(Arc::clone(&source)));
    target
        .write(&mut DetachedContext, false, content.into())
        .with_context(|| format!("failed to copy {from} to {to}"))?;
    Ok(())
}

#[cfg(unix)]
fn terminal(config: &Config) -> Result<()> {
    use sensory::stream::TerminalStream;

    let stream = TerminalStream::with_config(config).context("failed to open terminal stream")?;
    let mut stream = scopeguard::guard(stream, |mut stream| stream.halt());
    tracing::info!(
        device = %stream.device().display(),
        pid = stream.child_id(),
        "Terminal stream ready"
    );

    loop {
        stream.update()?;
        let Some(line) = stream.value().first().and_then(Value::name).map(str::to_string) else {
            break;
        };
        let echo = Value::strings(["echo: ".to_string(), line]);
        stream.write(&mut DetachedContext, false, echo.into())?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn terminal(_config: &Config) -> Result<()> {
    anyhow::bail!("terminal streams need a unix pseudo-terminal")
}
