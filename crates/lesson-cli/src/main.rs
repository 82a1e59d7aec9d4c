use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use lesson_parser::{ContentItem, Document};
use lesson_render::text::to_text;
use lesson_render::{escape_html, render, render_multiple, HtmlWriter, View};

mod config;
mod error;
mod store;

use config::Config;
use error::CliError;
use store::DirectoryStore;

#[derive(Parser)]
#[command(name = "lesson")]
#[command(about = "Author, check and render lesson content")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./lesson.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a lesson file to a standalone HTML page
    Build {
        /// Input lesson file
        path: PathBuf,

        /// Output file (defaults to the input with an .html extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a lesson file for errors without generating output
    Check {
        /// Input lesson file
        path: PathBuf,
    },

    /// Print a plain-text preview of a lesson file
    Preview {
        /// Input lesson file
        path: PathBuf,
    },

    /// Rewrite a lesson file in canonical form
    Fmt {
        /// Input lesson file
        path: PathBuf,

        /// Overwrite the file instead of printing
        #[arg(long)]
        write: bool,
    },

    /// Print the parsed document as JSON
    Json {
        /// Input lesson file
        path: PathBuf,
    },

    /// Render stored lessons, in order, as one page
    Schedule {
        /// Lesson ids
        ids: Vec<String>,

        /// Store directory (overrides [store] dir)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Print lesson titles instead of rendering
        #[arg(long)]
        toc: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref());

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logger(level: Option<&str>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if let Some(level) = level {
        match level.parse::<log::LevelFilter>() {
            Ok(filter) => {
                builder.filter_level(filter);
            }
            Err(_) => eprintln!("Invalid log level: {level}. Using RUST_LOG instead."),
        }
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let (config, config_path) = config::load(cli.config.as_deref(), &cwd)?;
    match &config_path {
        Some(path) => log::debug!("Using config from: {}", path.display()),
        None => log::debug!("Using default config"),
    }

    match cli.command {
        Command::Build { path, output } => cmd_build(&path, output.as_deref(), &config),
        Command::Check { path } => cmd_check(&path),
        Command::Preview { path } => cmd_preview(&path, &config),
        Command::Fmt { path, write } => cmd_fmt(&path, write),
        Command::Json { path } => cmd_json(&path),
        Command::Schedule {
            ids,
            store,
            toc,
            output,
        } => {
            let dir = store.unwrap_or_else(|| config.store.dir.clone());
            let mut store = DirectoryStore::new(dir);
            if toc {
                cmd_toc(&ids, &mut store)
            } else {
                cmd_schedule(&ids, &mut store, output.as_deref(), &config)
            }
        }
    }
}

// =========================================================================
// Commands
// =========================================================================

fn cmd_build(path: &Path, output: Option<&Path>, config: &Config) -> Result<(), CliError> {
    let source = read_source(path)?;
    let doc = validated(path, &source)?;

    let writer = HtmlWriter::new(config.html.options());
    let body = writer.write(&render(Some(&doc)));
    let page = standalone_page(&page_title(&doc, path), &body, config.html.stylesheet.as_deref());

    let html_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.with_extension("html"));
    write_file(&html_path, &page)?;

    eprintln!("Built: {}", html_path.display());
    Ok(())
}

fn cmd_check(path: &Path) -> Result<(), CliError> {
    let source = read_source(path)?;
    let doc = validated(path, &source)?;
    log::info!("{}: {} blocks", path.display(), doc.blocks.len());
    eprintln!("OK: {}", path.display());
    Ok(())
}

fn cmd_preview(path: &Path, config: &Config) -> Result<(), CliError> {
    print!("{}", preview_text(path, config)?);
    Ok(())
}

fn preview_text(path: &Path, config: &Config) -> Result<String, CliError> {
    let source = read_source(path)?;
    let doc = lesson_parser::parse(&source);
    Ok(to_text(&render(Some(&doc)), &config.html.not_found_message))
}

fn cmd_fmt(path: &Path, write: bool) -> Result<(), CliError> {
    let source = read_source(path)?;
    let doc = lesson_parser::parse(&source);

    let tagged = count_language_tags(&doc);
    if tagged > 0 {
        log::warn!(
            "{}: {tagged} code block language tags are not kept by fmt",
            path.display()
        );
    }

    let formatted = lesson_parser::generate(&doc);
    if write {
        write_file(path, &formatted)?;
        eprintln!("Formatted: {}", path.display());
    } else {
        print!("{formatted}");
    }
    Ok(())
}

fn cmd_json(path: &Path) -> Result<(), CliError> {
    let source = read_source(path)?;
    let doc = lesson_parser::parse(&source);
    let json = serde_json::to_string_pretty(&doc).map_err(CliError::Serialize)?;
    println!("{json}");
    Ok(())
}

fn cmd_schedule(
    ids: &[String],
    store: &mut DirectoryStore,
    output: Option<&Path>,
    config: &Config,
) -> Result<(), CliError> {
    let docs = fetch_all(ids, store)?;
    let view = if docs.is_empty() {
        View::NotFound
    } else {
        render_multiple(&docs)
    };

    let writer = HtmlWriter::new(config.html.options());
    let page = standalone_page("Schedule", &writer.write(&view), config.html.stylesheet.as_deref());

    match output {
        Some(path) => {
            write_file(path, &page)?;
            eprintln!("Built: {}", path.display());
        }
        None => print!("{page}"),
    }
    Ok(())
}

fn cmd_toc(ids: &[String], store: &mut DirectoryStore) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    for id in ids {
        let line = match store.title(id)? {
            Some(title) if !title.is_empty() => format!("{id}\t{title}"),
            Some(_) => format!("{id}\t(untitled)"),
            None => format!("{id}\t(not found)"),
        };
        // Ignore a closed pipe, as `head` would cause.
        if writeln!(stdout, "{line}").is_err() {
            break;
        }
    }
    log::debug!("{} titles cached", store.titles().len());
    Ok(())
}

// =========================================================================
// Helpers
// =========================================================================

fn read_source(path: &Path) -> Result<String, CliError> {
    if !path.exists() {
        return Err(CliError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and validate, turning a failure into a full explanation.
fn validated(path: &Path, source: &str) -> Result<Document, CliError> {
    lesson_parser::validate_source(source).map_err(|e| CliError::Invalid {
        path: path.to_path_buf(),
        explanation: lesson_parser::explain(&e, source),
    })
}

fn fetch_all(ids: &[String], store: &mut DirectoryStore) -> Result<Vec<Document>, CliError> {
    let mut docs = Vec::with_capacity(ids.len());
    for id in ids {
        match store.fetch(id)? {
            Some(doc) => docs.push(doc),
            None => log::warn!("lesson {id} not found in {}", store.dir().display()),
        }
    }
    Ok(docs)
}

fn count_language_tags(doc: &Document) -> usize {
    fn count(items: &[ContentItem]) -> usize {
        items
            .iter()
            .map(|item| match item {
                ContentItem::Code {
                    language: Some(_), ..
                } => 1,
                ContentItem::Collapsible { content, .. } => count(content),
                _ => 0,
            })
            .sum()
    }
    doc.blocks.iter().map(|block| count(&block.content)).sum()
}

fn page_title(doc: &Document, path: &Path) -> String {
    if !doc.title.is_empty() {
        return doc.title.clone();
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("lesson")
        .to_string()
}

/// Wrap rendered content in a complete HTML document.
fn standalone_page(title: &str, body: &str, stylesheet: Option<&str>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    if let Some(href) = stylesheet {
        html.push_str(&format!(
            "  <link rel=\"stylesheet\" href=\"{}\">\n",
            escape_html(href)
        ));
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}
