use anyhow::Result;
use poller::{PollOutcome, Poller};
use promo_common::observability::init_logging;
use promo_config::{Cli, PollConfig};
use promo_social::vc::VcApi;
use tokio_util::sync::CancellationToken;
mod poller;
mod shutdown;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1) Flags; clap prints usage and exits non-zero on failure
    let cli = Cli::parse_args().unwrap_or_else(|e| e.exit());

    init_logging(cli.log_config())?;

    // 2) Comment text and client, all before any network activity
    let cfg = PollConfig::from_cli(&cli)?;
    let api = VcApi::new(&cfg.auth_token)?;
    tracing::debug!(?cfg, ?api, "promo.startup");

    let cancel = CancellationToken::new();
    let _signals = shutdown::spawn_signal_listener(cancel.clone())?;

    match Poller::new(api, &cfg, cancel).run().await? {
        PollOutcome::Commented { post_id } => {
            tracing::info!(post_id, "promo.done.commented");
        }
        PollOutcome::Cancelled => {
            tracing::info!("promo.done.cancelled");
        }
    }
    Ok(())
}
