// src/crawl/events.rs
// =============================================================================
// Synchronous publish/subscribe for crawl events.
//
// - subscribe(handler) returns a handle that can later unsubscribe it
// - publish(event) calls every handler in subscription order, on the
//   scheduler's own thread, before returning
//
// A handler that returns an error stops the publish and the error goes up
// to whoever called the scheduler. Handlers that must not abort a crawl
// should swallow their own errors.
// =============================================================================

use crate::error::{CrawlError, Result};
use std::fmt;

type Handler<E> = Box<dyn FnMut(&E) -> anyhow::Result<()>>;

/// Identifies one subscription on one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// A list of handlers for one event type.
pub struct EventBus<E> {
    handlers: Vec<(SubscriptionHandle, Handler<E>)>,
    next_id: u64,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        EventBus {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionHandle
    where
        F: FnMut(&E) -> anyhow::Result<()> + 'static,
    {
        let handle = SubscriptionHandle(self.next_id);
        self.next_id += 1;
        self.handlers.push((handle, Box::new(handler)));
        handle
    }

    /// Removes a handler. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != handle);
        self.handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: &E) -> Result<()> {
        for (_, handler) in self.handlers.iter_mut() {
            handler(event).map_err(CrawlError::Subscriber)?;
        }
        Ok(())
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

/// A hostname seen for the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDomain {
    pub hostname: String,
}

/// An HTML page that was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageVisited {
    pub url: String,
    pub html: String,
}

/// A node taken off the frontier (concurrent mode only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDequeued {
    pub url: String,
}

/// All buses the scheduler publishes on.
#[derive(Debug, Default)]
pub struct CrawlEvents {
    pub new_domain: EventBus<NewDomain>,
    pub page_visited: EventBus<PageVisited>,
    pub node_dequeued: EventBus<NodeDequeued>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::<NewDomain>::new();

        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event| {
                seen.borrow_mut().push(format!("{}:{}", tag, event.hostname));
                Ok(())
            });
        }

        bus.publish(&NewDomain {
            hostname: "a.com".to_string(),
        })
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["first:a.com", "second:a.com"]);
    }

    #[test]
    fn test_failing_handler_stops_publish() {
        let calls = Rc::new(RefCell::new(0));
        let mut bus = EventBus::<NodeDequeued>::new();

        bus.subscribe(|_| Err(anyhow::anyhow!("disk full")));
        let counter = Rc::clone(&calls);
        bus.subscribe(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        let result = bus.publish(&NodeDequeued {
            url: "https://a.com/".to_string(),
        });

        assert!(matches!(result, Err(CrawlError::Subscriber(_))));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::<PageVisited>::new();
        let handle = bus.subscribe(|_| Ok(()));
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(handle));
        assert!(!bus.unsubscribe(handle));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
