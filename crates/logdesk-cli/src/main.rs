//! logdesk CLI: terminal client for the web-log agent

use clap::{Parser, Subcommand};
use logdesk_engine::{AgentResponse, Config, InferResponse, RequestClient, SessionPolicy};
use std::fmt::Display;
use std::fs::{self, File};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter.
const LOG_ENV: &str = "LOGDESK_LOG";

/// Chat with the web-log analysis agent from the terminal
#[derive(Parser)]
#[command(name = "logdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config_dir>/logdesk/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Agent server base URL, overrides config and LOGDESK_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Send one question to the log query endpoint
    Ask {
        /// Question text
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call the agent endpoint and show its tool trace
    Invoke {
        /// Question text
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the persisted session id
    Session {
        /// Delete the persisted session so the next request starts fresh
        #[arg(long)]
        reset: bool,
    },

    /// Write a default config file
    Init,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    init_tracing(matches!(command, Commands::Tui));

    match command {
        Commands::Tui => {
            let config = load_config(cli.config, cli.base_url);
            block_on(async {
                if let Err(e) = logdesk_tui::run_tui(&config).await {
                    fail(e);
                }
            });
        }
        Commands::Ask { input, json } => {
            cmd_ask(&load_config(cli.config, cli.base_url), &input, json);
        }
        Commands::Invoke { input, json } => {
            cmd_invoke(&load_config(cli.config, cli.base_url), &input, json);
        }
        Commands::Session { reset } => {
            cmd_session(&load_config(cli.config, cli.base_url), reset);
        }
        Commands::Init => cmd_init(cli.config),
    }
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn init_tracing(to_file: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // The TUI owns stderr's terminal, so its logs go to a file instead.
    if to_file {
        if let Some(file) = open_log_file() {
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        return;
    }

    builder.with_writer(std::io::stderr).init();
}

fn open_log_file() -> Option<File> {
    let dir = dirs::data_dir()?.join("logdesk");
    fs::create_dir_all(&dir).ok()?;
    File::options()
        .create(true)
        .append(true)
        .open(dir.join("logdesk.log"))
        .ok()
}

fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(Config::default_path)
        .unwrap_or_else(|| fail("Could not determine a config directory; pass --config"))
}

fn load_config(path: Option<PathBuf>, base_url: Option<String>) -> Config {
    let path = config_path(path);
    let mut config = match Config::load_or_default(&path) {
        Ok(config) => config,
        Err(e) => fail(format!("loading {}: {e}", path.display())),
    };
    config.apply_env();
    config.apply_base_url_override(base_url);
    config
}

fn block_on<F: Future>(future: F) -> F::Output {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => fail(format!("Failed to create tokio runtime: {e}")),
    }
}

fn client(config: &Config) -> RequestClient {
    RequestClient::from_config(config).unwrap_or_else(|e| fail(e))
}

fn cmd_init(path: Option<PathBuf>) {
    let path = config_path(path);

    if path.exists() {
        println!("Config already exists at {}", path.display());
        return;
    }

    if let Err(e) = Config::default().save(&path) {
        fail(format!("Failed to write config: {e}"));
    }
    println!("Wrote default config to {}", path.display());
}

fn cmd_ask(config: &Config, input: &str, json: bool) {
    let client = client(config);
    let response = block_on(client.query_log(input)).unwrap_or_else(|e| fail(e));

    if json {
        print_json(&response);
    } else {
        print_transcript(&response);
    }
}

fn print_transcript(response: &InferResponse) {
    for message in &response.messages {
        println!("{}: {}", message.role, message.text());
    }
}

fn cmd_invoke(config: &Config, input: &str, json: bool) {
    let client = client(config);
    let response = block_on(client.invoke_agent(input)).unwrap_or_else(|e| fail(e));

    if json {
        print_json(&response);
    } else {
        print_agent_response(&response);
    }
}

fn print_agent_response(response: &AgentResponse) {
    println!("{}", response.response);

    if response.all_contents.is_empty() {
        return;
    }

    println!();
    println!("Trace:");
    for (idx, entry) in response.all_contents.iter().enumerate() {
        println!(
            "  {}. [{}] {}",
            idx + 1,
            entry.kind,
            entry.content.as_deref().unwrap_or("")
        );
        for call in entry.tool_calls.iter().flatten() {
            let id = call.tool_call_id.as_deref().unwrap_or("-");
            println!("       -> {}({}) id={id}", call.name, call.args);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => fail(format!("failed to serialize: {e}")),
    }
}

fn cmd_session(config: &Config, reset: bool) {
    if config.session.policy == SessionPolicy::PerInstance {
        println!("No persisted session: policy is per_instance");
        return;
    }

    let Some(store) = config.session.store() else {
        fail("Could not determine a data directory for the session file");
    };

    if reset {
        match store.clear() {
            Ok(true) => println!("Session cleared ({})", store.path().display()),
            Ok(false) => println!("No session to clear"),
            Err(e) => fail(e),
        }
        return;
    }

    match store.load() {
        Ok(Some(token)) => println!("{token}"),
        Ok(None) => println!("No session yet; one is created on the first request"),
        Err(e) => fail(e),
    }
}
