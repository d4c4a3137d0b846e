use async_trait::async_trait;
use tracing::warn;

use crate::notify::notifier::Notifier;
use crate::types::alert_event::AlertEvent;

/// For headless hosts: alerts only reach the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &AlertEvent) {
        warn!("{alert}");
    }
}
