//! In-process publish/subscribe bus with named, type-tagged topics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(thiserror::Error, Debug)]
pub enum BusError {
    #[error("topic '{topic}' carries '{existing}', not '{requested}'")]
    TypeMismatch {
        topic: String,
        existing: String,
        requested: String,
    },
}

#[derive(Debug)]
struct TopicState<T> {
    type_name: Option<String>,
    senders: Vec<Sender<T>>,
    latched: Option<T>,
}

impl<T> TopicState<T> {
    fn new() -> Self {
        Self {
            type_name: None,
            senders: Vec::new(),
            latched: None,
        }
    }
}

#[derive(Debug)]
struct BusInner<T> {
    topics: HashMap<String, TopicState<T>>,
}

/// Shared topic registry. Cloning yields another handle to the same bus.
pub struct MessageBus<T> {
    inner: Arc<Mutex<BusInner<T>>>,
}

impl<T> Clone for MessageBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for MessageBus<T>
where
    T: Clone + Send,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MessageBus<T>
where
    T: Clone + Send,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                topics: HashMap::new(),
            })),
        }
    }

    /// Declares a publisher on `topic`. The first declared type tag sticks;
    /// later publishers and subscribers must agree with it.
    pub fn advertise(&self, topic: &str, type_name: &str) -> Result<Publisher<T>, BusError> {
        let mut inner = self.lock();
        let state = inner
            .topics
            .entry(topic.to_string())
            .or_insert_with(TopicState::new);
        claim_type(topic, state, type_name)?;
        log::debug!("advertised '{topic}' as {type_name}");
        Ok(Publisher {
            inner: Arc::clone(&self.inner),
            topic: topic.to_string(),
            latch: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn subscribe(&self, topic: &str, type_name: &str) -> Result<Subscription<T>, BusError> {
        let mut inner = self.lock();
        let state = inner
            .topics
            .entry(topic.to_string())
            .or_insert_with(TopicState::new);
        claim_type(topic, state, type_name)?;
        Ok(attach(topic, state))
    }

    /// Subscribes without declaring a type tag. The topic keeps whatever tag
    /// it already has, or stays untyped until a publisher claims one.
    pub fn subscribe_untyped(&self, topic: &str) -> Subscription<T> {
        let mut inner = self.lock();
        let state = inner
            .topics
            .entry(topic.to_string())
            .or_insert_with(TopicState::new);
        attach(topic, state)
    }

    pub fn topic_names(&self) -> Vec<String> {
        let inner = self.lock();
        let mut names: Vec<String> = inner.topics.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn topic_type(&self, topic: &str) -> Option<String> {
        let inner = self.lock();
        inner.topics.get(topic).and_then(|s| s.type_name.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BusInner<T>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn claim_type<T>(topic: &str, state: &mut TopicState<T>, type_name: &str) -> Result<(), BusError> {
    match &state.type_name {
        Some(existing) if existing != type_name => Err(BusError::TypeMismatch {
            topic: topic.to_string(),
            existing: existing.clone(),
            requested: type_name.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            state.type_name = Some(type_name.to_string());
            Ok(())
        }
    }
}

fn attach<T: Clone>(topic: &str, state: &mut TopicState<T>) -> Subscription<T> {
    let (sender, receiver) = mpsc::channel();
    // A latched sample is redelivered to every late joiner.
    if let Some(sample) = &state.latched {
        let _ = sender.send(sample.clone());
    }
    state.senders.push(sender);
    Subscription {
        receiver,
        topic: topic.to_string(),
    }
}

/// Sending half of a topic. Cloning shares the latch switch, so a clone
/// handed to a background thread observes later `set_latch` calls.
#[derive(Debug)]
pub struct Publisher<T> {
    inner: Arc<Mutex<BusInner<T>>>,
    topic: String,
    latch: Arc<AtomicBool>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            topic: self.topic.clone(),
            latch: Arc::clone(&self.latch),
        }
    }
}

impl<T> Publisher<T>
where
    T: Clone + Send,
{
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn latching(&self) -> bool {
        self.latch.load(Ordering::Relaxed)
    }

    /// Turning latching off also drops the stored sample, so future
    /// subscribers start empty.
    pub fn set_latch(&self, on: bool) {
        self.latch.store(on, Ordering::Relaxed);
        if !on {
            if let Ok(mut inner) = self.inner.lock() {
                if let Some(state) = inner.topics.get_mut(&self.topic) {
                    state.latched = None;
                }
            }
        }
    }

    pub fn publish(&self, message: T) {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(state) = inner.topics.get_mut(&self.topic) else {
            return;
        };
        let before = state.senders.len();
        state
            .senders
            .retain(|sender| sender.send(message.clone()).is_ok());
        let dropped = before - state.senders.len();
        if dropped > 0 {
            log::trace!("pruned {dropped} dead subscriber(s) on '{}'", self.topic);
        }
        if self.latch.load(Ordering::Relaxed) {
            state.latched = Some(message);
        }
    }
}

/// Receiving half of a topic. All reads are non-blocking; callers poll
/// from their own loop.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: Receiver<T>,
    topic: String,
}

impl<T> Subscription<T> {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn try_recv(&self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(value) => Some(value),
            Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => None,
        }
    }

    /// Takes everything queued right now, oldest first.
    pub fn drain(&self) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(value) = self.try_recv() {
            out.push(value);
        }
        out
    }
}
