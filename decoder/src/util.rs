use tracing_forest::{printer::PrettyPrinter, ForestLayer};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// The default `Level` is `INFO`. It can be overridden with `RUST_LOG`.
/// Logs are printed to stderr since stdout carries the converted trace.
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let printer = PrettyPrinter::new().writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(ForestLayer::from(printer))
        .init();
}
