use std::sync::Arc;

use eyre::Result;
use tracing_subscriber::EnvFilter;

use medsim_api::http::HttpCaseApi;
use medsim_cli::config;
use medsim_cli::repl::{self, Repl};
use medsim_render::text::TextRenderer;
use medsim_session::controller::SessionController;

const LOG_FORMAT_ENV: &str = "MEDSIM_LOG_FORMAT";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let config = config::load_or_init()?.with_env_overrides(|key| std::env::var(key).ok());
    tracing::debug!(backend = %config.backend_url, prefix = %config.api_prefix, "config loaded");

    let api = HttpCaseApi::new(&config.api_settings())?;
    let controller = SessionController::new(Arc::new(api));
    let renderer = TextRenderer::new(config.color)?;

    repl::run(Repl::new(controller, renderer, config.color)).await
}

/// Logs go to stderr and default to `warn` so they stay out of the REPL.
/// `MEDSIM_LOG_FORMAT=json` switches to structured JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
