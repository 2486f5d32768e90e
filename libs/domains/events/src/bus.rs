use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 32;

/// Filter changes published by whatever owns the search box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMessage {
    Search(String),
    /// `None` or `"all"` clears the type filter
    EventType(Option<String>),
}

/// Typed publish/subscribe channel for search input.
///
/// Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct SearchBus {
    tx: broadcast::Sender<SearchMessage>,
}

impl SearchBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns how many subscribers received the message
    pub fn publish(&self, message: SearchMessage) -> usize {
        self.tx.send(message).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchMessage> {
        self.tx.subscribe()
    }
}

impl Default for SearchBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = SearchBus::new();
        assert_eq!(bus.publish(SearchMessage::Search("x".into())), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let bus = SearchBus::new();
        let mut rx = bus.subscribe();

        bus.publish(SearchMessage::Search("party".into()));
        bus.publish(SearchMessage::EventType(Some("Concert".into())));

        assert_eq!(rx.recv().await.unwrap(), SearchMessage::Search("party".into()));
        assert_eq!(
            rx.recv().await.unwrap(),
            SearchMessage::EventType(Some("Concert".into()))
        );
    }
}
