pub mod adapter;
pub mod commands;
pub mod error;
pub mod ipc;
pub mod settings;
pub mod state;
mod worker;

use state::AppState;

/// Serve the JSON-lines protocol on stdin/stdout until stdin closes.
pub fn run() {
    // stdout carries the protocol, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("error while building tokio runtime");

    let result = runtime.block_on(ipc::serve(
        AppState::new(),
        tokio::io::BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        settings::settings_path(),
    ));

    if let Err(e) = result {
        tracing::error!(error = %e, "Host stopped");
        std::process::exit(1);
    }
}
