//! The iterative day-cycle scheduler.
//!
//! The original bot drives its activity cycle by having `daylife` call
//! `spawn` call `daylife` again at every wake/sleep boundary, growing the
//! call stack for as long as the process lives. This scheduler runs the
//! same two activities — timeline monitoring and periodic news posting —
//! as plain loops instead, so a long-running bot process has bounded
//! stack depth.

use std::time::Duration;

use futures::StreamExt;
use rand::Rng;
use snafu::{ResultExt, Snafu};
use tanka_tokenise::AnalyzerPool;
use tankabot_social::{
    NewStatus, NotificationKind, RetryingClient, SocialClient, TimelineEvent, Visibility,
};
use tankabot_store::{NewCandidate, Store};
use tracing::{debug, info, instrument, warn};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    TimelineStreamFailed { source: tankabot_social::Error },
}

const UNFOLLOW_KEYWORD: &str = "フォロー解除";

/// Watch the user timeline: reply with any tanka found in others' posts,
/// follow back new followers, and honor unfollow-me mentions.
#[instrument(skip_all)]
pub async fn monitor_task<C: SocialClient>(
    social: &RetryingClient<C>,
    analyzer_pool: &AnalyzerPool,
    bot_account_id: &str,
) -> Result<()> {
    let mut events = social
        .stream_user_timeline()
        .await
        .context(TimelineStreamFailedError)?;

    while let Some(event) = events.next().await {
        match event {
            TimelineEvent::Update(status) => {
                if status.reblog || status.mentions_count != 0 || status.account_id == bot_account_id {
                    continue;
                }
                if let Err(err) = respond_to_update(social, analyzer_pool, &status).await {
                    info!(%err, "could not reply to status");
                }
            }
            TimelineEvent::Notification(notification) => {
                if let Err(err) = respond_to_notification(social, &notification, bot_account_id).await
                {
                    info!(%err, "could not react to notification");
                }
            }
            TimelineEvent::Error(message) => {
                warn!(message, "received error event on timeline stream");
            }
        }
    }

    Ok(())
}

async fn respond_to_update<C: SocialClient>(
    social: &RetryingClient<C>,
    analyzer_pool: &AnalyzerPool,
    status: &tankabot_social::Status,
) -> Result<(), tankabot_social::Error> {
    let text = tanka_html::html_to_text(&status.content_html).unwrap_or_default();
    let tankas = tanka_engine::extract_tanka(&text, analyzer_pool).await;
    if tankas.is_empty() {
        return Ok(());
    }

    let body = tanka_engine::join_for_reply(&tankas);
    let (spoiler, message) = if status.spoiler_text.is_empty() {
        (None, format!("@{} 短歌を発見しました！\n\n{body}", status.acct))
    } else {
        (
            Some("短歌を発見しました！".to_owned()),
            format!("@{} \n\n{body}", status.acct),
        )
    };

    let mut new_status = NewStatus::new(message, status.visibility).reply_to(status.id.clone());
    if let Some(spoiler) = spoiler {
        new_status = new_status.spoiler(spoiler);
    }
    social.post(new_status).await?;
    Ok(())
}

async fn respond_to_notification<C: SocialClient>(
    social: &RetryingClient<C>,
    notification: &tankabot_social::Notification,
    bot_account_id: &str,
) -> Result<(), tankabot_social::Error> {
    match notification.kind {
        NotificationKind::Follow => {
            let rel = social.relationship(&notification.account_id).await?;
            if !rel.following {
                social.follow(&notification.account_id).await?;
            }
        }
        NotificationKind::Mention => {
            if let Some(status) = &notification.status {
                if status.account_id == bot_account_id {
                    return Ok(());
                }
                let text = tanka_html::html_to_text(&status.content_html).unwrap_or_default();
                if text.contains(UNFOLLOW_KEYWORD) {
                    let rel = social.relationship(&notification.account_id).await?;
                    if rel.following {
                        social.unfollow(&notification.account_id).await?;
                    }
                }
            }
        }
        NotificationKind::Reblog | NotificationKind::Favourite => {}
    }
    Ok(())
}

/// Periodically post one harvested tanka candidate, pruning the stock of
/// older finds first, until the process is told to stop.
#[instrument(skip_all)]
pub async fn news_post_task<C: SocialClient>(
    store: &Store,
    social: &RetryingClient<C>,
    bot_id: i32,
    posts_per_day: u32,
    keep_n: i64,
) {
    let base_interval_mins = 24 * 60 / posts_per_day.max(1);
    loop {
        let jitter = rand::thread_rng().gen_range(0..(base_interval_mins / 3).max(1) * 2);
        let wait_mins = base_interval_mins - base_interval_mins / 3 + jitter;
        tokio::time::sleep(Duration::from_secs(u64::from(wait_mins) * 60)).await;

        if let Err(err) = store.prune_oldest(bot_id, keep_n).await {
            info!(%err, "could not prune old candidates");
            continue;
        }

        match store.pick_random(bot_id).await {
            Ok(Some(candidate)) => {
                let message = format!("{}\n\n{}\n{}", candidate.tankas, candidate.title, candidate.url);
                let new_status = NewStatus::new(message, Visibility::Public);
                match social.post(new_status).await {
                    Ok(_) => {
                        if let Err(err) = store.delete_candidate(bot_id, candidate.item_id).await {
                            info!(%err, "could not delete posted candidate");
                        }
                    }
                    Err(err) => info!(%err, "could not post news toot"),
                }
            }
            Ok(None) => debug!("no candidates to post"),
            Err(err) => info!(%err, "could not pick a candidate"),
        }
    }
}

/// Stock the candidate table with every harvested item whose body
/// contains at least one tanka.
#[instrument(skip(store, analyzer_pool, items))]
pub async fn harvest_items(
    store: &Store,
    analyzer_pool: &AnalyzerPool,
    bot_id: i32,
    items: &[tankabot_store::HarvestedItem],
) -> std::result::Result<(), tankabot_store::Error> {
    let mut found = Vec::new();
    for item in items {
        let tankas = tanka_engine::extract_tanka(&item.content, analyzer_pool).await;
        if tankas.is_empty() {
            continue;
        }
        found.push(NewCandidate {
            item_id: item.id,
            tankas: tanka_engine::join_for_reply(&tankas),
        });
    }
    if found.is_empty() {
        return Ok(());
    }
    store.stock_candidates(bot_id, &found).await
}

/// Run the monitor and news-post activities until `run_for` elapses, or
/// forever when it is `None` (`-p 0`).
pub async fn run<C: SocialClient + 'static>(
    store: Store,
    social: RetryingClient<C>,
    analyzer_pool: AnalyzerPool,
    bot_id: i32,
    bot_account_id: String,
    posts_per_day: u32,
    keep_n: i64,
    run_for: Option<Duration>,
) {
    let social = std::sync::Arc::new(social);
    let analyzer_pool = std::sync::Arc::new(analyzer_pool);

    let monitor = {
        let social = social.clone();
        let analyzer_pool = analyzer_pool.clone();
        tokio::spawn(async move {
            if let Err(err) = monitor_task(&social, &analyzer_pool, &bot_account_id).await {
                warn!(%err, "timeline monitor stopped");
            }
        })
    };

    let news = {
        let social = social.clone();
        tokio::spawn(async move {
            news_post_task(&store, &social, bot_id, posts_per_day, keep_n).await;
        })
    };

    match run_for {
        Some(duration) => {
            tokio::time::sleep(duration).await;
            monitor.abort();
            news.abort();
            info!("run-time budget exhausted, shutting down");
        }
        None => {
            let _ = tokio::join!(monitor, news);
        }
    }
}
