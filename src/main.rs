use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use courier::app::AppContext;
use courier::daemon::{Daemon, DaemonConfig};
use courier::poster::Poster;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ctx = AppContext::from_env()?;
    tracing::info!(
        channel = %ctx.config.channel_id,
        state_file = %ctx.config.state_file.display(),
        "Configuration loaded"
    );

    // A bad token or an outage is not fatal; the loop keeps retrying.
    match ctx.publisher.current_user().await {
        Ok(user) => tracing::info!(user = %user.username, id = %user.id, "Logged in"),
        Err(e) => tracing::error!(error = %e, "Could not verify Discord credentials"),
    }

    let poster = Poster::load(ctx)?;
    match poster.watermark().last_guid() {
        Some(guid) => tracing::info!(guid = %guid, "Resuming from watermark"),
        None => tracing::info!("No watermark yet, the first check will only record one"),
    }

    Daemon::new(poster, DaemonConfig::default()).run().await;

    Ok(())
}
