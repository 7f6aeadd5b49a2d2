//! `tjsonb` CLI: mutate JSON documents and temporal JSON documents from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Add a key (stdin → stdout)
//! echo '{"a":1}' | tjsonb set --path b --value 2 --create
//!
//! # Insert after the first array element, file to file
//! tjsonb insert -i doc.json -o out.json --path tags --path 0 --value '"new"' --after
//!
//! # Remove a nested member
//! tjsonb delete-path -i doc.json --path a --path b
//!
//! # Remove top-level keys at every instant of a temporal document
//! tjsonb delete --temporal -i trip.json --key debug --key raw
//!
//! # Merge a constant document into every instant, pretty-printed
//! tjsonb concat --temporal -i trip.json --with '{"unit":"kmh"}' --pretty
//! ```
//!
//! Set `RUST_LOG=debug` to trace what the engine does (written to stderr).

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jsonb_core::{Jsonb, Path};
use tjsonb_engine::Temporal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tjsonb",
    version,
    about = "Path mutation, concatenation, and key deletion for JSON and temporal JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the document comes from and how the result is written.
#[derive(Args)]
struct IoArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Treat the input as a temporal document (instant, sequence, or sequence set)
    #[arg(long)]
    temporal: bool,
    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the value at a path, optionally creating it
    Set {
        #[command(flatten)]
        io: IoArgs,
        /// Path element; repeat for each level (e.g. --path a --path 0)
        #[arg(long = "path", required = true)]
        path: Vec<String>,
        /// New value as JSON text
        #[arg(long)]
        value: String,
        /// Add the final key or index when it is missing
        #[arg(long)]
        create: bool,
    },
    /// Insert a value next to an array element, or add a missing key
    Insert {
        #[command(flatten)]
        io: IoArgs,
        /// Path element; repeat for each level
        #[arg(long = "path", required = true)]
        path: Vec<String>,
        /// New value as JSON text
        #[arg(long)]
        value: String,
        /// Insert after the target element instead of before it
        #[arg(long)]
        after: bool,
    },
    /// Remove the member at a path
    DeletePath {
        #[command(flatten)]
        io: IoArgs,
        /// Path element; repeat for each level
        #[arg(long = "path", required = true)]
        path: Vec<String>,
    },
    /// Remove top-level keys (and matching string array elements)
    Delete {
        #[command(flatten)]
        io: IoArgs,
        /// Key to remove; repeat to remove several
        #[arg(long = "key", required = true)]
        keys: Vec<String>,
    },
    /// Concatenate the input with another document
    Concat {
        #[command(flatten)]
        io: IoArgs,
        /// Other operand as JSON text
        #[arg(long, conflicts_with = "with_file", required_unless_present = "with_file")]
        with: Option<String>,
        /// Other operand read from a file (a temporal document with --temporal)
        #[arg(long)]
        with_file: Option<String>,
        /// Put the other operand on the left
        #[arg(long)]
        prepend: bool,
    },
}

/// A parsed input: plain or temporal.
enum Document {
    Plain(Jsonb),
    Temporal(Temporal<Jsonb>),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Set {
            io,
            path,
            value,
            create,
        } => {
            let path = Path::from_texts(&path);
            let value = parse_value(&value)?;
            let result = match load(&io)? {
                Document::Plain(doc) => Document::Plain(
                    jsonb_core::set_path(&doc, &path, &value, create)
                        .context("Failed to set path")?,
                ),
                Document::Temporal(temp) => Document::Temporal(
                    tjsonb_engine::set_tjsonb_path(&temp, &path, &value, create)
                        .context("Failed to set path")?,
                ),
            };
            store(&io, &result)?;
        }
        Commands::Insert {
            io,
            path,
            value,
            after,
        } => {
            let path = Path::from_texts(&path);
            let value = parse_value(&value)?;
            let result = match load(&io)? {
                Document::Plain(doc) => Document::Plain(
                    jsonb_core::insert_path(&doc, &path, &value, after)
                        .context("Failed to insert at path")?,
                ),
                Document::Temporal(temp) => Document::Temporal(
                    tjsonb_engine::insert_tjsonb_path(&temp, &path, &value, after)
                        .context("Failed to insert at path")?,
                ),
            };
            store(&io, &result)?;
        }
        Commands::DeletePath { io, path } => {
            let path = Path::from_texts(&path);
            let result = match load(&io)? {
                Document::Plain(doc) => Document::Plain(
                    jsonb_core::delete_path(&doc, &path).context("Failed to delete path")?,
                ),
                Document::Temporal(temp) => Document::Temporal(
                    tjsonb_engine::delete_tjsonb_path(&temp, &path)
                        .context("Failed to delete path")?,
                ),
            };
            store(&io, &result)?;
        }
        Commands::Delete { io, keys } => {
            let result = match load(&io)? {
                Document::Plain(doc) => Document::Plain(
                    jsonb_core::delete_keys(&doc, &keys).context("Failed to delete keys")?,
                ),
                Document::Temporal(mut temp) => {
                    for key in &keys {
                        temp = tjsonb_engine::delete_tjsonb_key(&temp, key)
                            .with_context(|| format!("Failed to delete key '{}'", key))?;
                    }
                    Document::Temporal(temp)
                }
            };
            store(&io, &result)?;
        }
        Commands::Concat {
            io,
            with,
            with_file,
            prepend,
        } => {
            let input = load(&io)?;
            let other_text = match (with, with_file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_input(Some(path.as_str()))?,
                (None, None) => anyhow::bail!("concat needs --with or --with-file"),
            };
            let result = concat_documents(input, &other_text, io.temporal, prepend)?;
            store(&io, &result)?;
        }
    }

    Ok(())
}

/// Concatenate the loaded input with the other operand. With `--temporal`, an
/// operand object carrying a `subtype` key must be a valid temporal document;
/// anything else is a plain document.
fn concat_documents(
    input: Document,
    other_text: &str,
    temporal: bool,
    prepend: bool,
) -> Result<Document> {
    let other = if temporal {
        let value: serde_json::Value = serde_json::from_str(other_text.trim())
            .with_context(|| format!("Invalid JSON value: {}", other_text))?;
        if has_subtype(&value) {
            let temp = serde_json::from_value::<Temporal<Jsonb>>(value)
                .context("Failed to parse temporal operand")?;
            Document::Temporal(temp)
        } else {
            Document::Plain(Jsonb::from(value))
        }
    } else {
        Document::Plain(parse_value(other_text)?)
    };

    let (left, right) = if prepend { (other, input) } else { (input, other) };
    debug!(prepend, "concatenating documents");

    let result = match (left, right) {
        (Document::Plain(a), Document::Plain(b)) => {
            Document::Plain(jsonb_core::concat(&a, &b).context("Failed to concatenate")?)
        }
        (Document::Plain(a), Document::Temporal(b)) => Document::Temporal(
            tjsonb_engine::concat_jsonb_tjsonb(&a, &b).context("Failed to concatenate")?,
        ),
        (Document::Temporal(a), Document::Plain(b)) => Document::Temporal(
            tjsonb_engine::concat_tjsonb_jsonb(&a, &b).context("Failed to concatenate")?,
        ),
        (Document::Temporal(a), Document::Temporal(b)) => Document::Temporal(
            tjsonb_engine::concat_tjsonb_tjsonb(&a, &b).context("Failed to concatenate")?,
        ),
    };
    Ok(result)
}

fn has_subtype(value: &serde_json::Value) -> bool {
    value.as_object().is_some_and(|obj| obj.contains_key("subtype"))
}

fn parse_value(text: &str) -> Result<Jsonb> {
    text.trim()
        .parse::<Jsonb>()
        .with_context(|| format!("Invalid JSON value: {}", text))
}

fn load(io: &IoArgs) -> Result<Document> {
    let text = read_input(io.input.as_deref())?;
    if io.temporal {
        let temp = serde_json::from_str::<Temporal<Jsonb>>(&text)
            .context("Failed to parse temporal document")?;
        Ok(Document::Temporal(temp))
    } else {
        let doc = text
            .trim()
            .parse::<Jsonb>()
            .context("Failed to parse JSON document")?;
        Ok(Document::Plain(doc))
    }
}

fn store(io: &IoArgs, doc: &Document) -> Result<()> {
    let text = match (doc, io.pretty) {
        (Document::Plain(doc), false) => doc.to_string(),
        (Document::Plain(doc), true) => format!("{:#}", doc),
        (Document::Temporal(temp), false) => serde_json::to_string(temp)?,
        (Document::Temporal(temp), true) => serde_json::to_string_pretty(temp)?,
    };
    write_output(io.output.as_deref(), &text)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
