mod client;
mod retry;

pub use client::{
    AccountId, Error, NewStatus, Notification, NotificationId, NotificationKind, Relationship,
    SocialClient, Status, StatusId, TimelineEvent, Visibility,
};
pub use retry::{with_retry, RetryPolicy};

use futures::stream::BoxStream;
use tracing::instrument;

/// Wraps any [`SocialClient`] so every mutating call follows the
/// jitter-then-retry policy every remote call in the original bot used.
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: SocialClient> RetryingClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    #[instrument(skip(self))]
    pub async fn stream_user_timeline(&self) -> Result<BoxStream<'static, TimelineEvent>, Error> {
        self.inner.stream_user_timeline().await
    }

    #[instrument(skip(self, status))]
    pub async fn post(&self, status: NewStatus) -> Result<Status, Error> {
        with_retry(&self.policy, "post_status", || {
            let status = status.clone();
            async move { self.inner.post_status(status).await }
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn follow(&self, account_id: &str) -> Result<Relationship, Error> {
        with_retry(&self.policy, "follow", || self.inner.follow(account_id)).await
    }

    #[instrument(skip(self))]
    pub async fn unfollow(&self, account_id: &str) -> Result<Relationship, Error> {
        with_retry(&self.policy, "unfollow", || self.inner.unfollow(account_id)).await
    }

    #[instrument(skip(self))]
    pub async fn relationship(&self, account_id: &str) -> Result<Relationship, Error> {
        with_retry(&self.policy, "relationship", || {
            self.inner.relationship(account_id)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, Error> {
        with_retry(&self.policy, "list_notifications", || {
            self.inner.list_notifications()
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn dismiss_notification(&self, notification_id: &str) -> Result<(), Error> {
        with_retry(&self.policy, "dismiss_notification", || {
            self.inner.dismiss_notification(notification_id)
        })
        .await
    }
}
