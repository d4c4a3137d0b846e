use async_trait::async_trait;

use crate::types::alert_event::AlertEvent;

pub type DynamicNotifier = Box<dyn Notifier + Send + Sync>;

/// Fire-and-forget sink for operator alerts. Delivery failures are the
/// implementation's to log; callers never see them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &AlertEvent);
}
