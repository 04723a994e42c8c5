use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Read};
use termdown_config::Config;
use termdown_diagram::TextDiagramRenderer;
use termdown_engine::{RenderMode, render_mermaid_blocks};

#[derive(Parser, Debug)]
#[command(name = "termdown")]
#[command(version)]
#[command(about = "Display markdown in the terminal, rendering mermaid diagrams as text")]
struct Args {
    /// Markdown file to display; "-" or absent reads stdin
    file: Option<String>,

    /// Maximum document width in columns (non-positive = unbounded)
    #[arg(short, long)]
    width: Option<i64>,

    /// How to treat mermaid blocks: plain, ascii or unicode
    #[arg(long, value_name = "MODE")]
    render_mermaid: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: ignoring config file: {e}");
            Config::default()
        }
    };

    let mode = resolve_mode(args.render_mermaid.as_deref(), config.render_mermaid.as_deref())?;
    let width = resolve_width(args.width.or(config.width));
    let input = read_input(args.file.as_deref())?;

    let renderer = TextDiagramRenderer::new();
    let output = render_mermaid_blocks(&input, mode, width, &renderer);
    print!("{output}");

    Ok(())
}

/// Flag wins over config; the default is the untouched document.
fn resolve_mode(flag: Option<&str>, config: Option<&str>) -> Result<RenderMode> {
    let value = flag.or(config).unwrap_or("plain");
    value
        .parse()
        .with_context(|| format!("invalid --render-mermaid value {value:?}"))
}

/// Flag wins over config; with neither, a tty's width bounds the output and
/// piped output is unbounded.
fn resolve_width(requested: Option<i64>) -> Option<usize> {
    match requested {
        Some(w) if w > 0 => Some(w as usize),
        Some(_) => None,
        None => detect_terminal_width(),
    }
}

fn detect_terminal_width() -> Option<usize> {
    if std::io::stdout().is_terminal() {
        crossterm::terminal::size()
            .ok()
            .map(|(cols, _)| cols as usize)
    } else {
        None
    }
}

fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path:?}"))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
