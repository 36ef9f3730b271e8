use dotenvy::dotenv;
use instra_bot::bot::handlers::{self, Command};
use instra_bot::bot::messages::{ErrorMessages, GenerativeMessages, StaticMessages};
use instra_bot::bot::PendingLinks;
use instra_bot::config::Settings;
use instra_bot::llm::GeminiClient;
use instra_bot::resolver::HttpMediaResolver;
use instra_bot::{bot, health};
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting sensitive data
struct RedactionPatterns {
    token1: Regex,
    token2: Regex,
    token3: Regex,
    gemini: Regex,
}

impl RedactionPatterns {
    /// Initialize all regex patterns
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token1: Regex::new(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)(/['\s]*)")?,
            token2: Regex::new(r"([0-9]{8,10}:[A-Za-z0-9_-]{35})")?,
            token3: Regex::new(r"(bot[0-9]{8,10}:)[A-Za-z0-9_-]+")?,
            gemini: Regex::new(r"AIza[0-9A-Za-z_-]{35}")?,
        })
    }

    fn redact(&self, input: &str) -> String {
        let mut output = input.to_string();
        output = self
            .token1
            .replace_all(&output, "$1[TELEGRAM_TOKEN]$3")
            .to_string();
        output = self
            .token2
            .replace_all(&output, "[TELEGRAM_TOKEN]")
            .to_string();
        output = self
            .token3
            .replace_all(&output, "$1[TELEGRAM_TOKEN]")
            .to_string();
        output = self
            .gemini
            .replace_all(&output, "[GEMINI_API_KEY]")
            .to_string();
        output
    }
}

struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    const fn new(inner: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { inner, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // We return the original buffer length to satisfy the contract,
        // even if the redacted string length differs.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<F> RedactingMakeWriter<F> {
    const fn new(make_inner: F, patterns: Arc<RedactionPatterns>) -> Self {
        Self {
            make_inner,
            patterns,
        }
    }
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.make_inner)(), self.patterns.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(patterns);

    info!("Starting Instra media relay bot...");

    let settings = init_settings();

    let bot = Bot::new(settings.telegram_token.clone());
    let links = Arc::new(PendingLinks::new());
    let resolver = Arc::new(HttpMediaResolver::new(settings.resolver_url.clone()));
    let strategy = init_strategy(&settings);

    spawn_health_listener(settings.health_port);

    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![links, resolver, strategy])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn init_logging(patterns: Arc<RedactionPatterns>) {
    let make_writer = RedactingMakeWriter::new(io::stderr, patterns);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}

fn init_settings() -> Settings {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            error!(
                "Telegram bot token is missing or configuration is invalid. \
                 Please set the TELEGRAM_TOKEN environment variable: {e}"
            );
            std::process::exit(1);
        }
    }
}

fn init_strategy(settings: &Settings) -> Arc<dyn ErrorMessages> {
    match settings.gemini_api_key.clone() {
        Some(key) => {
            info!("Generative error messages enabled (Gemini).");
            Arc::new(GenerativeMessages::new(GeminiClient::new(key)))
        }
        None => {
            info!("Using static error messages.");
            Arc::new(StaticMessages)
        }
    }
}

fn spawn_health_listener(port: u16) {
    tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            error!("Liveness listener failed: {e}");
        }
    });
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_selection))
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(
                    Update::filter_message()
                        .filter(|msg: Message| msg.text().is_some())
                        .endpoint(handle_text),
                ),
        )
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => bot::handlers::start(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_text(
    bot: Bot,
    msg: Message,
    links: Arc<PendingLinks>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_text(bot, msg, links).await {
        error!("Text handler error: {}", e);
    }
    respond(())
}

async fn handle_selection(
    bot: Bot,
    q: CallbackQuery,
    links: Arc<PendingLinks>,
    resolver: Arc<HttpMediaResolver>,
    strategy: Arc<dyn ErrorMessages>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = Box::pin(handlers::handle_selection(bot, q, links, resolver, strategy)).await {
        error!("Selection handler error: {}", e);
    }
    respond(())
}
