//! The poll-and-act loop: fetch the promo timeline on a fixed tick, comment
//! on the first qualifying post, then stop.
use chrono::{DateTime, Local};
use promo_common::Result;
use promo_config::PollConfig;
use promo_social::PromoFeed;
use promo_social::vc::{Verdict, classify, select::local_time};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Source of "now" for the calendar-day check.
pub type Clock = fn() -> DateTime<Local>;

/// How the loop finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Commented { post_id: i64 },
    Cancelled,
}

pub struct Poller<F> {
    feed: F,
    comment_text: String,
    interval: Duration,
    cancel: CancellationToken,
    clock: Clock,
}

impl<F: PromoFeed> Poller<F> {
    pub fn new(feed: F, cfg: &PollConfig, cancel: CancellationToken) -> Self {
        Self {
            feed,
            comment_text: cfg.comment_text.clone(),
            interval: cfg.poll_interval,
            cancel,
            clock: Local::now,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Tick until a comment is posted, the token is cancelled, or a request
    /// fails. Cancellation is only observed between ticks; a fetch or post in
    /// flight always runs to completion.
    pub async fn run(&self) -> Result<PollOutcome> {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("poller.cancelled");
                    return Ok(PollOutcome::Cancelled);
                }
                _ = ticker.tick() => {
                    if let Some(post_id) = self.tick().await? {
                        return Ok(PollOutcome::Commented { post_id });
                    }
                }
            }
        }
    }

    /// One fetch-and-filter pass. Returns the id commented on, if any.
    async fn tick(&self) -> Result<Option<i64>> {
        tracing::info!("Fetching promo timeline...");
        let entries = self.feed.fetch_timeline().await?;
        let now = (self.clock)();

        for entry in &entries {
            let date = local_time(entry.timestamp, &now.timezone())
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %z").to_string())
                .unwrap_or_else(|| format!("@{}", entry.timestamp));

            let verdict = classify(entry, &now);
            tracing::info!(title = %entry.title, %date, "{}", verdict.reason());
            if verdict != Verdict::Matched {
                continue;
            }

            self.feed.add_comment(entry.id, &self.comment_text).await?;
            tracing::info!(post_id = entry.id, "Comment was posted.");
            return Ok(Some(entry.id));
        }

        Ok(None)
    }
}
