use std::sync::Arc;

use tokio::sync::broadcast;

use crate::events::MessageEvent;

/// Fan-out point decoupling message persistence from notification
/// delivery. Cheap to clone; all clones share the one channel.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    broadcast_tx: broadcast::Sender<MessageEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    /// Subscribe to message events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<MessageEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all listeners. Having no listener is fine.
    pub fn broadcast(&self, event: MessageEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_created_event() {
        let dispatcher = Dispatcher::new();
        let mut rx = dispatcher.subscribe();

        dispatcher.broadcast(MessageEvent::Created {
            id: 7,
            from_username: "alice".into(),
        });

        let MessageEvent::Created { id, from_username } = rx.recv().await.unwrap();
        assert_eq!(id, 7);
        assert_eq!(from_username, "alice");
    }

    #[test]
    fn broadcast_without_listeners_is_a_noop() {
        let dispatcher = Dispatcher::new();
        dispatcher.broadcast(MessageEvent::Created {
            id: 1,
            from_username: "alice".into(),
        });
    }
}
