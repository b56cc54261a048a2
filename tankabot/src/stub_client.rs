//! A `SocialClient` that talks to no server: an empty timeline, and every
//! mutating call just logs what it would have sent. Lets the binary boot
//! and run the scheduler end-to-end before a real wire-protocol client
//! (Mastodon HTTP/websocket) is wired in.

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use tankabot_social::{
    Error, NewStatus, Notification, Relationship, SocialClient, Status, TimelineEvent,
};
use tracing::info;

pub struct LoggingStubClient;

#[async_trait]
impl SocialClient for LoggingStubClient {
    async fn stream_user_timeline(&self) -> Result<BoxStream<'static, TimelineEvent>, Error> {
        Ok(Box::pin(stream::empty()))
    }

    async fn post_status(&self, status: NewStatus) -> Result<Status, Error> {
        info!(text = %status.text, "would post status");
        Ok(Status {
            id: "stub".to_owned(),
            account_id: "stub".to_owned(),
            acct: "stub".to_owned(),
            content_html: status.text,
            visibility: status.visibility,
            spoiler_text: status.spoiler_text.unwrap_or_default(),
            mentions_count: 0,
            reblog: false,
        })
    }

    async fn follow(&self, account_id: &str) -> Result<Relationship, Error> {
        info!(account_id, "would follow");
        Ok(Relationship {
            id: account_id.to_owned(),
            following: true,
            followed_by: false,
        })
    }

    async fn unfollow(&self, account_id: &str) -> Result<Relationship, Error> {
        info!(account_id, "would unfollow");
        Ok(Relationship {
            id: account_id.to_owned(),
            following: false,
            followed_by: false,
        })
    }

    async fn relationship(&self, account_id: &str) -> Result<Relationship, Error> {
        Ok(Relationship {
            id: account_id.to_owned(),
            following: false,
            followed_by: false,
        })
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, Error> {
        Ok(Vec::new())
    }

    async fn dismiss_notification(&self, _notification_id: &str) -> Result<(), Error> {
        Ok(())
    }
}
