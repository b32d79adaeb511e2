use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use changer_monitor::changer_client::{ChangerClient, SlotBoard};
use changer_monitor::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().await;
    let client = match ChangerClient::discover(&config) {
        Ok(client) => client,
        Err(err) => {
            error!(error = ?err, "Failed to set up changer client");
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested, canceling in-flight polls");
                cancel.cancel();
            }
        });
    }

    let mut board = SlotBoard::new();

    loop {
        match client.refresh_board(&mut board, &cancel).await {
            Ok(()) => info!(slots = board.len(), "Refreshed changer status"),
            Err(err) => warn!(error = ?err, "Status refresh failed"),
        }
        print!("{}", board.render());

        if config.refresh_interval_secs == 0 || cancel.is_cancelled() {
            break;
        }
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(config.refresh_interval_secs)) => {}
            _ = cancel.cancelled() => break,
        }
    }
}
