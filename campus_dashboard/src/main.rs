use std::{env, time::Duration};

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use uc_api::{ApiClient, fetchers::DEFAULT_ACTIVE_MINUTES};
use uc_app::ContextProvider;

mod commands;
mod renderers;
mod views;
use commands::{Command, USAGE};
use views::{Dashboard, parse_views};

#[derive(Debug, Clone, Deserialize)]
struct Config {
    base_url: String,
    /// Whole-request timeout; 0 keeps the HTTP client's default.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default = "default_notes_interval_ms")]
    notes_interval_ms: u64,
    #[serde(default = "default_messages_interval_ms")]
    messages_interval_ms: u64,
    #[serde(default = "default_notifications_interval_ms")]
    notifications_interval_ms: u64,
    #[serde(default = "default_monitoring_interval_ms")]
    monitoring_interval_ms: u64,
    #[serde(default)]
    filiere_id: Option<i64>,
    #[serde(default = "default_active_minutes")]
    active_minutes: u32,
    #[serde(default = "default_views")]
    views: String,
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_notes_interval_ms() -> u64 {
    5_000
}

const fn default_messages_interval_ms() -> u64 {
    10_000
}

const fn default_notifications_interval_ms() -> u64 {
    15_000
}

const fn default_monitoring_interval_ms() -> u64 {
    10_000
}

const fn default_active_minutes() -> u32 {
    DEFAULT_ACTIVE_MINUTES
}

fn default_views() -> String {
    "notes,messages,notifications,monitoring".to_string()
}

#[derive(Debug, Clone)]
struct AppContext {
    client: ApiClient,
    config: Config,
}

impl ContextProvider<Config> for AppContext {
    async fn new(config: Config) -> Result<Self, uc_app::Error> {
        let timeout = (config.request_timeout_secs > 0)
            .then(|| Duration::from_secs(config.request_timeout_secs));
        let client = ApiClient::new(&config.base_url, timeout)?;

        Ok(Self { client, config })
    }
}

#[tokio::main]
async fn main() -> Result<(), uc_app::Error> {
    let context =
        uc_app::create_app_context::<AppContext, Config>().await?;

    // a command on the command line runs once, without the dashboard
    let args: Vec<String> = env::args().skip(1).collect();
    if !args.is_empty() {
        let words: Vec<&str> = args.iter().map(String::as_str).collect();
        return run_once(&context, &words).await;
    }

    run_live(&context).await
}

async fn run_once(
    context: &AppContext,
    words: &[&str],
) -> Result<(), uc_app::Error> {
    if matches!(words, ["help" | "--help" | "-h"]) {
        println!("{USAGE}");
        return Ok(());
    }

    let command = Command::parse(words)?;
    match command.execute(&context.client).await? {
        Some(toast) => {
            println!("ok: {toast}");
            Ok(())
        }
        None => Err(format!("{words:?} only works in the live dashboard").into()),
    }
}

async fn run_live(context: &AppContext) -> Result<(), uc_app::Error> {
    let views = parse_views(&context.config.views)?;
    if views.is_empty() {
        return Err("no view selected, set VIEWS".into());
    }

    let mut dashboard =
        Dashboard::build(&context.client, &context.config, &views).await?;
    info!(
        "watching {} with {}",
        context.client.base_url(),
        dashboard.names().join(", ")
    );
    dashboard.start_all();

    let mut stdin = Some(BufReader::new(tokio::io::stdin()).lines());

    loop {
        let event = tokio::select! {
            signal = tokio::signal::ctrl_c() => Event::Interrupt(signal),
            line = next_line(&mut stdin) => Event::Line(line),
        };

        match event {
            Event::Interrupt(Ok(())) => {
                info!("interrupted");
                break;
            }
            Event::Interrupt(Err(e)) => {
                error!("cannot listen for ctrl-c: {e}");
                break;
            }
            Event::Line(Ok(Some(line))) => {
                let words: Vec<&str> = line.split_whitespace().collect();
                if words.is_empty() {
                    continue;
                }
                if handle_line(context, &dashboard, &words).await == Flow::Quit {
                    break;
                }
            }
            Event::Line(Ok(None)) => {
                // stdin closed: keep polling until interrupted
                stdin = None;
            }
            Event::Line(Err(e)) => {
                error!("cannot read stdin: {e}");
                stdin = None;
            }
        }
    }

    dashboard.stop_all();

    Ok(())
}

enum Event {
    Interrupt(std::io::Result<()>),
    Line(std::io::Result<Option<String>>),
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

async fn next_line(
    stdin: &mut Option<Lines<BufReader<Stdin>>>,
) -> std::io::Result<Option<String>> {
    match stdin {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}

async fn handle_line(
    context: &AppContext,
    dashboard: &Dashboard,
    words: &[&str],
) -> Flow {
    if words == ["help"] {
        println!("{USAGE}");
        return Flow::Continue;
    }

    let command = match Command::parse(words) {
        Ok(command) => command,
        Err(e) => {
            println!("error: {e} (type help)");
            return Flow::Continue;
        }
    };

    match command {
        Command::Quit => return Flow::Quit,
        Command::Refresh => dashboard.refresh(None),
        _ => match command.execute(&context.client).await {
            Ok(toast) => {
                if let Some(toast) = toast {
                    println!("ok: {toast}");
                }
                dashboard.refresh(command.affected_view());
            }
            Err(e) => println!("error: {e}"),
        },
    }

    Flow::Continue
}
