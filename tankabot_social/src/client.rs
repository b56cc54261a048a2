//! The shape of the social-client boundary the scheduler is written
//! against. `SocialClient` models a Mastodon-like server: streaming
//! timeline, posting, follow graph, notifications. A concrete
//! implementation plugs in the wire protocol; this crate only commits
//! to the retry policy wrapped around every call.

use async_trait::async_trait;
use futures::stream::BoxStream;
use snafu::Snafu;

pub type AccountId = String;
pub type StatusId = String;
pub type NotificationId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
    Direct,
}

#[derive(Debug, Clone)]
pub struct NewStatus {
    pub text: String,
    pub visibility: Visibility,
    pub spoiler_text: Option<String>,
    pub in_reply_to: Option<StatusId>,
}

impl NewStatus {
    pub fn new(text: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            text: text.into(),
            visibility,
            spoiler_text: None,
            in_reply_to: None,
        }
    }

    pub fn reply_to(mut self, status_id: impl Into<StatusId>) -> Self {
        self.in_reply_to = Some(status_id.into());
        self
    }

    pub fn spoiler(mut self, text: impl Into<String>) -> Self {
        self.spoiler_text = Some(text.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Status {
    pub id: StatusId,
    pub account_id: AccountId,
    pub acct: String,
    pub content_html: String,
    pub visibility: Visibility,
    pub spoiler_text: String,
    pub mentions_count: usize,
    pub reblog: bool,
}

#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: AccountId,
    pub following: bool,
    pub followed_by: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Mention,
    Reblog,
    Favourite,
    Follow,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub account_id: AccountId,
    pub status: Option<Status>,
}

#[derive(Debug, Clone)]
pub enum TimelineEvent {
    Update(Status),
    Notification(Notification),
    Error(String),
}

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    #[snafu(display("failed to open user timeline stream: {message}"))]
    StreamOpenFailed { message: String },
    #[snafu(display("failed to post status: {message}"))]
    PostFailed { message: String },
    #[snafu(display("failed to follow {account_id}: {message}"))]
    FollowFailed { account_id: AccountId, message: String },
    #[snafu(display("failed to unfollow {account_id}: {message}"))]
    UnfollowFailed { account_id: AccountId, message: String },
    #[snafu(display("failed to fetch relationship with {account_id}: {message}"))]
    RelationshipFailed { account_id: AccountId, message: String },
    #[snafu(display("failed to list notifications: {message}"))]
    ListNotificationsFailed { message: String },
    #[snafu(display("failed to dismiss notification {notification_id}: {message}"))]
    DismissNotificationFailed {
        notification_id: NotificationId,
        message: String,
    },
}

type Result<T, E = Error> = std::result::Result<T, E>;

/// Operations a scheduler needs from the social backend, independent
/// of wire protocol.
#[async_trait]
pub trait SocialClient: Send + Sync {
    async fn stream_user_timeline(&self) -> Result<BoxStream<'static, TimelineEvent>>;
    async fn post_status(&self, status: NewStatus) -> Result<Status>;
    async fn follow(&self, account_id: &str) -> Result<Relationship>;
    async fn unfollow(&self, account_id: &str) -> Result<Relationship>;
    async fn relationship(&self, account_id: &str) -> Result<Relationship>;
    async fn list_notifications(&self) -> Result<Vec<Notification>>;
    async fn dismiss_notification(&self, notification_id: &str) -> Result<()>;
}
