use figment::{Figment, providers::Env};
use serde::Deserialize;

/// Boxed error type returned by context constructors.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub trait ContextProvider<Config>: Sized {
    fn new(config: Config) -> impl Future<Output = Result<Self, Error>>;
}

/// Settings read alongside every binary's own configuration.
#[derive(Debug, Deserialize)]
struct Envelope<Config> {
    #[serde(default)]
    log_json: bool,

    #[serde(flatten)]
    config: Config,
}

/// Load a configuration struct from environment variables.
///
/// Variable names are matched case-insensitively against the struct's
/// field names, so `BASE_URL` fills `base_url`.
///
/// # Errors
/// If a required variable is missing or a value cannot be parsed into
/// the field's type.
pub fn load_config<'a, Config: Deserialize<'a>>() -> Result<Config, figment::Error>
{
    load_envelope::<Config>().map(|envelope| envelope.config)
}

fn load_envelope<'a, Config: Deserialize<'a>>()
-> Result<Envelope<Config>, figment::Error> {
    Figment::new().merge(Env::raw()).extract()
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so that binaries can keep stdout for their own
/// output. The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        // the target adds noise without telling which controller logged
        .with_target(false);

    if json {
        builder
            .json()
            // span context is duplicated in every line otherwise
            .with_current_span(false)
            .init();
    } else {
        builder.init();
    }
}

/// Initialize the application context with configuration from environment
/// variables.
///
/// Installs the tracing subscriber (JSON output when `LOG_JSON=true`),
/// extracts `Config` with figment and hands it to the context
/// constructor.
///
/// # Errors
/// If the configuration cannot be extracted from the environment variables
/// or if the context constructor fails.
pub async fn create_app_context<'a, A, Config: Deserialize<'a>>()
-> Result<A, Error>
where
    A: ContextProvider<Config>,
{
    let envelope = load_envelope::<Config>()?;

    init_tracing(envelope.log_json);

    A::new(envelope.config).await
}
