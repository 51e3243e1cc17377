use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tabime_engine::{MatchMode, PhraseTable, TableDb};
use tabime_im::{EditorConfig, EngineAction, KeyEvent, Keysym, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// tabime table tool: build, inspect and try out phrase tables.
#[derive(Parser, Debug)]
#[command(name = "tabime-table")]
#[command(about = "tabime table tool: build, inspect and try out phrase tables")]
struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a TSV table from JSON or TSV input.
    ///
    /// - `json`: Array of {code, phrases: [{phrase, rank}]}
    /// - `tsv`: code\tphrase[\trank] lines (normalized and deduplicated)
    ///
    /// Format is auto-detected from file extension (.json → JSON, otherwise → TSV),
    /// or can be explicitly specified with --format.
    Build {
        /// Input table file
        input: PathBuf,

        /// Output TSV table file
        #[arg(short, long, default_value = "table.tsv")]
        output: PathBuf,

        /// Input format: json or tsv (auto-detected from extension if omitted)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Look up a code and print candidates in rank order.
    Query {
        /// TSV table file
        table: PathBuf,

        /// Code to look up
        code: String,

        /// Only match the code exactly (default: prefix match)
        #[arg(short, long)]
        exact: bool,

        /// Maximum number of candidates
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every entry of a table in registration order.
    Dump {
        /// TSV table file
        table: PathBuf,
    },

    /// Replay keys through an input session and print each update.
    ///
    /// Letters go to the code buffer, `1`-`9` select, space commits the first
    /// candidate, `<` is backspace, `[`/`]` page back/forward and `!` cancels.
    Type {
        /// TSV table file
        table: PathBuf,

        /// Keys to replay
        keys: String,

        /// Candidates per page
        #[arg(long, default_value = "6")]
        page_size: usize,

        /// Write rank changes back to the table file
        #[arg(long)]
        save: bool,
    },
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string()
}

fn open_table(path: &Path) -> Result<TableDb> {
    TableDb::open(table_name(path), path).with_context(|| format!("opening {:?}", path))
}

// --- build subcommand ---

fn run_build(input: PathBuf, output: PathBuf, format: Option<String>) -> Result<()> {
    let format =
        format
            .as_deref()
            .unwrap_or_else(|| match input.extension().and_then(|e| e.to_str()) {
                Some("json") => "json",
                _ => "tsv",
            });

    eprintln!("Building table from {:?} (format: {})...", input, format);

    let name = table_name(&output);
    let table = match format {
        "json" => TableDb::build_from_json(&name, &input)?,
        "tsv" => {
            let source = open_table(&input)?;
            TableDb::from_entries(&name, source.entries()?)
        }
        other => anyhow::bail!("Unknown format: {}. Use 'json' or 'tsv'.", other),
    };

    let entries = table.entries()?;
    eprintln!(
        "{} entries under {} codes",
        entries.len(),
        tabime_engine::table::distinct_codes(&entries)
    );

    eprintln!("Saving to {:?}...", output);
    table.save_to(&output)?;

    eprintln!("Done.");
    Ok(())
}

// --- query subcommand ---

fn run_query(table: PathBuf, code: String, exact: bool, limit: usize, json: bool) -> Result<()> {
    let db = open_table(&table)?;
    let mode = if exact {
        MatchMode::Exact
    } else {
        MatchMode::Prefix
    };
    let results = db.lookup(&code, mode, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        eprintln!("No entries found for code \"{}\"", code);
        return Ok(());
    }
    for c in &results {
        println!("{}\t{}\t{}", c.code, c.phrase, c.rank);
    }
    eprintln!("({} candidates)", results.len());
    Ok(())
}

// --- dump subcommand ---

fn run_dump(table: PathBuf) -> Result<()> {
    let db = open_table(&table)?;
    let entries = db.entries()?;
    for e in &entries {
        println!("{}\t{}\t{}", e.code, e.phrase, e.rank);
    }
    eprintln!("({} entries total)", entries.len());
    Ok(())
}

// --- type subcommand ---

/// Map a replay character to a key press
fn replay_key(ch: char) -> KeyEvent {
    let keysym = match ch {
        '<' => Keysym::BACKSPACE,
        '[' => Keysym::PAGE_UP,
        ']' => Keysym::PAGE_DOWN,
        '!' => Keysym::ESCAPE,
        ' ' => Keysym::SPACE,
        c => Keysym(c as u32),
    };
    KeyEvent::press(keysym)
}

fn describe(action: &EngineAction) -> String {
    match action {
        EngineAction::UpdatePreedit(p) => format!("preedit \"{}\"", p.text()),
        EngineAction::ShowCandidates(view) => {
            let items: Vec<String> = view
                .texts
                .iter()
                .enumerate()
                .map(|(i, t)| format!("{}.{}", i + 1, t))
                .collect();
            format!(
                "candidates page {} [{}]{}{}",
                view.page_index + 1,
                items.join(" "),
                if view.has_prev { " <" } else { "" },
                if view.has_next { " >" } else { "" },
            )
        }
        EngineAction::HideCandidates => "hide candidates".to_string(),
        EngineAction::Commit(text) => format!("commit \"{}\"", text),
        EngineAction::UpdateAuxText(text) => format!("aux \"{}\"", text),
        EngineAction::HideAuxText => "hide aux".to_string(),
    }
}

fn run_type(table: PathBuf, keys: String, page_size: usize, save: bool) -> Result<()> {
    let db = open_table(&table)?;
    let name = db.name().to_string();
    // Unbacked copy unless rank changes should reach the file
    let db = if save {
        db
    } else {
        TableDb::from_entries(&name, db.entries()?)
    };

    let config = EditorConfig {
        page_size,
        ..EditorConfig::default()
    };
    tracing::debug!("replaying {} keys on table '{}'", keys.chars().count(), name);
    let mut session = Session::with_table(name, Arc::new(db), config);
    let committed = replay(&mut session, &keys);
    println!("=> {}", committed);
    Ok(())
}

/// Feed `keys` to `session`, printing each result, and return the text the
/// application would end up with.
fn replay(session: &mut Session, keys: &str) -> String {
    let mut committed = String::new();
    for ch in keys.chars() {
        let key = replay_key(ch);
        let result = session.process_key(&key);
        let consumed = if result.consumed { "" } else { " (passed)" };
        println!("{:?}{}", ch, consumed);
        for action in &result.actions {
            println!("  {}", describe(action));
            if let EngineAction::Commit(text) = action {
                committed.push_str(text);
            }
        }
        // Passed-through printable keys reach the application as typed
        if !result.consumed
            && let Some(typed) = key.to_char()
        {
            committed.push(typed);
        }
    }
    committed
}

// --- main ---

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "tabime_table=debug,tabime_engine=debug,tabime_im=debug"
    } else {
        "tabime_table=info,tabime_engine=info,tabime_im=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build {
            input,
            output,
            format,
        } => run_build(input, output, format),
        Commands::Query {
            table,
            code,
            exact,
            limit,
            json,
        } => run_query(table, code, exact, limit, json),
        Commands::Dump { table } => run_dump(table),
        Commands::Type {
            table,
            keys,
            page_size,
            save,
        } => run_type(table, keys, page_size, save),
    }
}
