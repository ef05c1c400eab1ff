//! Navigator that hands redirects to the host over a channel.

use tokio::sync::mpsc;

use bakehouse_core::traits::Navigator;
use bakehouse_core::types::Redirect;

/// Forwards every redirect to the receiving half returned by
/// [`ChannelNavigator::new`].
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Redirect>,
}

impl ChannelNavigator {
    /// Create a navigator and the receiver the host reads redirects from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Redirect>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate_to(&self, redirect: Redirect) {
        tracing::info!(target_url = %redirect, "Navigating");
        if self.tx.send(redirect).is_err() {
            tracing::warn!("Redirect dropped: host receiver is gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use bakehouse_core::types::LogoutReason;

    use super::*;

    #[test]
    fn test_redirects_are_forwarded_in_order() {
        let (navigator, mut rx) = ChannelNavigator::new();
        navigator.navigate_to(LogoutReason::Inactivity.login_redirect());
        navigator.navigate_to(LogoutReason::Deactivated.login_redirect());

        assert_eq!(
            rx.try_recv().map(|r| r.to_url()).ok().as_deref(),
            Some("/login?reason=inactivity")
        );
        assert_eq!(
            rx.try_recv().map(|r| r.to_url()).ok().as_deref(),
            Some("/login?reason=deactivated")
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_receiver_does_not_panic() {
        let (navigator, rx) = ChannelNavigator::new();
        drop(rx);
        navigator.navigate_to(LogoutReason::Inactivity.login_redirect());
    }
}
