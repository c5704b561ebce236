mod batch;
mod jobs;
mod notification;

pub use batch::{BatchOutcome, BatchService};
pub use jobs::{JobError, JobService};
pub use notification::{
    create_notification_service, NotificationConfig, NotificationHandle, NotificationKind,
    NotificationService, Notifier, WebhookConfig,
};
