mod demo;
mod telemetry;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::model::TestId;
use services::{
    ApiClient, ApiConfig, Clock, ProgressSink, TestContentProvider, TestSessionService,
};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTestId { raw: String },
    InvalidTimeout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTestId { raw } => write!(f, "invalid --test-id value: {raw}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout-ms value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    test_sessions: Arc<TestSessionService>,
    launch_test_id: Option<TestId>,
}

impl UiApp for DesktopApp {
    fn test_sessions(&self) -> Arc<TestSessionService> {
        Arc::clone(&self.test_sessions)
    }

    fn launch_test_id(&self) -> Option<TestId> {
        self.launch_test_id
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- ui   [--api-url <url>] [--token <token>] [--timeout-ms <ms>] [--test-id <id>]"
    );
    eprintln!("  cargo run -p app -- demo [--test-id <id>]   # offline, in-memory tests 1 and 2");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --api-url http://localhost:8080/api");
    eprintln!("  --timeout-ms 10000");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  EXAM_API_URL, EXAM_API_TOKEN, EXAM_API_TIMEOUT_MS, EXAM_TEST_ID, EXAM_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Demo,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    token: Option<String>,
    timeout_ms: Option<u64>,
    test_id: Option<TestId>,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        accept_api_flags: bool,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            test_id: std::env::var("EXAM_TEST_ID")
                .ok()
                .and_then(|value| value.parse::<TestId>().ok()),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" if accept_api_flags => {
                    parsed.api_url = Some(require_value(args, "--api-url")?);
                }
                "--token" if accept_api_flags => {
                    parsed.token = Some(require_value(args, "--token")?);
                }
                "--timeout-ms" if accept_api_flags => {
                    let value = require_value(args, "--timeout-ms")?;
                    let ms = value
                        .parse::<u64>()
                        .ok()
                        .filter(|ms| *ms > 0)
                        .ok_or_else(|| ArgsError::InvalidTimeout { raw: value.clone() })?;
                    parsed.timeout_ms = Some(ms);
                }
                "--test-id" => {
                    let value = require_value(args, "--test-id")?;
                    let id = value
                        .parse::<TestId>()
                        .map_err(|_| ArgsError::InvalidTestId { raw: value.clone() })?;
                    parsed.test_id = Some(id);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    /// Environment first, flags on top.
    fn api_config(&self) -> Result<ApiConfig, services::ApiError> {
        let mut config = ApiConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url)?;
        }
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing()?;

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, cmd == Command::Ui).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let (content, progress): (Arc<dyn TestContentProvider>, Arc<dyn ProgressSink>) = match cmd {
        Command::Ui => {
            let config = parsed.api_config()?;
            tracing::info!(?config, "Using test backend");
            let client = Arc::new(ApiClient::new(config)?);
            (client.clone() as Arc<dyn TestContentProvider>, client as Arc<dyn ProgressSink>)
        }
        Command::Demo => {
            tracing::info!("Using in-memory demo backend");
            let backend = Arc::new(demo::seeded_backend()?);
            (backend.clone() as Arc<dyn TestContentProvider>, backend as Arc<dyn ProgressSink>)
        }
    };

    let test_sessions = Arc::new(TestSessionService::new(
        Clock::default_clock(),
        content,
        progress,
    ));
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        test_sessions,
        launch_test_id: parsed.test_id,
    });
    let context = build_app_context(&app);

    // Some dev setups default to an always-on-top window; disable it explicitly.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Exams")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
