use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use mongo_chat::config::{self, AppConfig};
use mongo_chat::presenter::{present, present_message, render_text};
use mongo_chat::logging::init_logging;
use mongo_chat::Session;

// ─── Example questions shown on startup ──────────────────────────────────────

const EXAMPLE_QUESTIONS: &[&str] = &[
    "show me schema",
    "how many students",
    "show all documents",
    "find students with GPA above 3.5",
    "get top 5 students by GPA",
    "show names and majors of Computer Science students",
];

#[derive(Parser)]
#[command(name = "mongo-chat", version)]
#[command(about = "Ask a MongoDB collection questions in plain language")]
struct Cli {
    /// Database name (overrides MONGO_CHAT__MONGO__DATABASE)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Collection name (overrides MONGO_CHAT__MONGO__COLLECTION)
    #[arg(long, global = true)]
    collection: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat with the collection
    Chat,

    /// Ask a single question (non-interactive)
    Ask {
        question: String,
        /// Print the result envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the inferred collection schema
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut cfg = config::load_config().unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    if let Some(db) = cli.database { cfg.mongo.database = db; }
    if let Some(coll) = cli.collection { cfg.mongo.collection = coll; }

    let mut session = Session::connect(&cfg)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to MongoDB: {e}"))?;

    match cli.command {
        Command::Chat => repl(&mut session).await,

        Command::Ask { question, json } => {
            let envelope = session.ask(&question).await;
            print_notices(&session);
            if json {
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                print!("{}", render_text(&present(&envelope)));
            }
        }

        Command::Schema => {
            println!("{}", session.schema().to_markdown());
        }
    }
    Ok(())
}

fn print_notices(session: &Session) {
    for notice in session.take_notices() {
        println!("✗ {notice}");
    }
}

/// Interactive loop: ask questions until "exit".
async fn repl(session: &mut Session) {
    println!();
    println!("╔════════════════════════════════════════════════════╗");
    println!("║   Mongo Chat                                       ║");
    println!("╠════════════════════════════════════════════════════╣");
    println!("  Collection: {}", session.collection_name());
    println!("  Commands:   /history, /sample, exit");
    println!("  Examples:");
    for q in EXAMPLE_QUESTIONS {
        println!("    • {}", q);
    }
    println!("╚════════════════════════════════════════════════════╝");
    println!();

    for message in session.history() {
        print!("{}", render_text(&present_message(message)));
    }
    println!("{}", session.schema().to_markdown());

    loop {
        print!("❯ ");
        io::stdout().flush().ok();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let question = input.trim();

        if question.is_empty() { continue; }
        if question.eq_ignore_ascii_case("exit")
            || question.eq_ignore_ascii_case("quit")
            || question == "q" { break; }

        match question {
            "/history" => match serde_json::to_string_pretty(session.history()) {
                Ok(json) => println!("{json}"),
                Err(e) => println!("✗ Cannot serialize history: {e}"),
            },
            "/sample" => match session.sample().first() {
                Some(doc) => println!("{}", serde_json::to_string_pretty(doc).unwrap_or_default()),
                None => println!("No sample documents available."),
            },
            _ => {
                let envelope = session.ask(question).await;
                print_notices(session);
                print!("{}", render_text(&present(&envelope)));
            }
        }
        println!();
    }
}
