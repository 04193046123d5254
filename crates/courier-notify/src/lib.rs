pub mod dispatcher;
pub mod events;
pub mod sms;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::dispatcher::Dispatcher;
use crate::events::MessageEvent;
use crate::sms::SmsGateway;

/// Listener task: one SMS alert per created message. Runs detached —
/// the message-send path only broadcasts onto the channel and never
/// waits on anything in here. Gateway failures are logged and dropped.
pub async fn run(dispatcher: Dispatcher, gateway: SmsGateway) {
    let mut rx = dispatcher.subscribe();
    info!("SMS notifier listening for message events");

    loop {
        match rx.recv().await {
            Ok(MessageEvent::Created { id, from_username }) => {
                if let Err(e) = gateway.notify_new_message(&from_username).await {
                    warn!("SMS alert for message {} failed: {:#}", id, e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("notifier fell behind, {} events skipped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}
