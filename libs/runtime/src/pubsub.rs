//! Publisher-Side Subscription Pattern
//!
//! A [`SubscriberTable`] is owned by a publishing actor, not by the system:
//! subscription state lives with the publisher, and subscribers are plain
//! [`ActorRef`]s so local and cross-runtime consumers fan out through the
//! same send path. Wire it up by decoding `Subscribe` / `Unsubscribe` in the
//! publisher's receive loop and calling [`subscribe`](SubscriberTable::subscribe)
//! / [`unsubscribe`](SubscriberTable::unsubscribe) with the envelope sender.

use crate::actor_ref::ActorRef;
use crate::message::Message;
use crate::system::ActorSystem;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace, warn};

/// One subscriber's resolved reference and its topic set.
#[derive(Debug, Clone)]
pub struct SubscriberEntry {
    actor: ActorRef,
    topics: BTreeSet<String>,
}

impl SubscriberEntry {
    pub fn actor(&self) -> &ActorRef {
        &self.actor
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(String::as_str)
    }
}

/// Per-publisher map from subscriber name to its entry.
///
/// References are resolved once at subscribe time and reused for every
/// publish; a subscriber that later unregisters shows up as failed sends,
/// which the publisher may use to evict it.
#[derive(Debug, Default)]
pub struct SubscriberTable {
    entries: HashMap<String, SubscriberEntry>,
}

impl SubscriberTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `topic` for the named sender, resolving the sender through
    /// `system` on first contact.
    ///
    /// Returns the subscriber's reference so the publisher can push an
    /// initial snapshot. An envelope without a sender name, or a sender the
    /// directory cannot resolve, is rejected with `None`. Re-subscribing to
    /// a topic already held is a no-op.
    pub fn subscribe(
        &mut self,
        system: &ActorSystem,
        sender: Option<&str>,
        topic: &str,
    ) -> Option<ActorRef> {
        let sender = match sender {
            Some(sender) => sender,
            None => {
                warn!(topic, "subscribe without sender name ignored");
                return None;
            }
        };
        if let Some(entry) = self.entries.get_mut(sender) {
            if !entry.topics.insert(topic.to_owned()) {
                debug!(subscriber = sender, topic, "duplicate subscription ignored");
            }
            return Some(entry.actor.clone());
        }
        let actor = match system.resolve(sender) {
            Some(actor) => actor,
            None => {
                warn!(subscriber = sender, topic, "subscriber not resolvable, ignored");
                return None;
            }
        };
        debug!(subscriber = sender, topic, "subscription added");
        let mut topics = BTreeSet::new();
        topics.insert(topic.to_owned());
        self.entries.insert(
            sender.to_owned(),
            SubscriberEntry {
                actor: actor.clone(),
                topics,
            },
        );
        Some(actor)
    }

    /// Drop `topic` for the named sender; the entry goes away with its last
    /// topic. Unknown sender or topic is a no-op.
    pub fn unsubscribe(&mut self, sender: Option<&str>, topic: &str) {
        let sender = match sender {
            Some(sender) => sender,
            None => return,
        };
        if let Some(entry) = self.entries.get_mut(sender) {
            if entry.topics.remove(topic) {
                debug!(subscriber = sender, topic, "subscription removed");
            }
            if entry.topics.is_empty() {
                self.entries.remove(sender);
            }
        }
    }

    /// Send a freshly built message to every subscriber of `topic`.
    ///
    /// `make` runs once per matching subscriber because each send transfers
    /// ownership of its message. Returns the number of successful sends;
    /// failures are logged and skipped, the publisher keeps going.
    pub fn publish(
        &self,
        topic: &str,
        publisher: &str,
        make: impl Fn() -> Box<dyn Message>,
    ) -> usize {
        let mut delivered = 0;
        for (name, entry) in &self.entries {
            if !entry.topics.contains(topic) {
                continue;
            }
            match entry.actor.send(make(), Some(publisher)) {
                Ok(status) if status.is_delivered() => {
                    trace!(subscriber = %name, topic, "published");
                    delivered += 1;
                }
                Ok(status) => {
                    warn!(subscriber = %name, topic, code = status.status_code(), "publish not delivered");
                }
                Err(err) => {
                    warn!(subscriber = %name, topic, %err, "publish failed");
                }
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_subscribed(&self, sender: &str, topic: &str) -> bool {
        self.entries
            .get(sender)
            .is_some_and(|entry| entry.topics.contains(topic))
    }

    /// Subscriber names holding `topic`.
    pub fn topics_for(&self, sender: &str) -> Vec<String> {
        self.entries
            .get(sender)
            .map(|entry| entry.topics.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove a subscriber entirely, for eviction after failed sends.
    pub fn remove(&mut self, sender: &str) {
        if self.entries.remove(sender).is_some() {
            debug!(subscriber = sender, "subscriber removed");
        }
    }
}
