//! Outbound notification collaborator. A real deployment plugs an SMTP
//! sender in here; the server itself only depends on the trait and treats
//! every send as best-effort.

use async_trait::async_trait;
use tracing::info;

/// Addressee of a notification.
#[derive(Debug, Clone)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell a giver who they drew.
    async fn match_assigned(&self, giver: &Contact, recipient_name: &str) -> anyhow::Result<()>;

    /// Tell a santa that their giftee added a wishlist item.
    async fn wishlist_updated(
        &self,
        santa: &Contact,
        giftee_name: &str,
        item_title: &str,
    ) -> anyhow::Result<()>;

    /// Welcome a freshly created account, with its one-time password.
    async fn welcome(&self, to: &Contact, password: Option<&str>) -> anyhow::Result<()>;
}

/// Stand-in notifier that only logs. Used when no mail transport is wired up.
#[derive(Debug, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn match_assigned(&self, giver: &Contact, recipient_name: &str) -> anyhow::Result<()> {
        info!(to = %giver.email, recipient = recipient_name, "match notification (not sent: no transport)");
        Ok(())
    }

    async fn wishlist_updated(
        &self,
        santa: &Contact,
        giftee_name: &str,
        item_title: &str,
    ) -> anyhow::Result<()> {
        info!(to = %santa.email, giftee = giftee_name, item = item_title, "wishlist notification (not sent: no transport)");
        Ok(())
    }

    async fn welcome(&self, to: &Contact, _password: Option<&str>) -> anyhow::Result<()> {
        info!(to = %to.email, "welcome notification (not sent: no transport)");
        Ok(())
    }
}
