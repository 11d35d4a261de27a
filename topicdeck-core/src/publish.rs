use crate::PanelError;
use msgschema::{apply_form, build_form, FormModel, MessageSchema, MessageValue, SchemaRegistry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use topicbus::{MessageBus, Publisher};

pub const DEFAULT_RATE_HZ: i64 = 5;

/// One publishing form bound to a topic. The form lives behind a mutex so
/// the repeat thread can snapshot it while the UI edits it.
#[derive(Debug)]
pub struct PublishPanel {
    topic: String,
    schema: MessageSchema,
    registry: Arc<SchemaRegistry>,
    publisher: Publisher<MessageValue>,
    pub form: Arc<Mutex<FormModel>>,
    pub rate_hz: i64,
    pub last_error: Option<String>,
    repeat: Option<RepeatHandle>,
}

impl PublishPanel {
    pub fn new(
        bus: &MessageBus<MessageValue>,
        registry: Arc<SchemaRegistry>,
        topic: &str,
        type_name: &str,
    ) -> Result<Self, PanelError> {
        let schema = registry.resolve(type_name)?.clone();
        let publisher = bus.advertise(topic, type_name)?;
        let form = build_form(&registry, &schema);
        Ok(Self {
            topic: topic.to_string(),
            schema,
            registry,
            publisher,
            form: Arc::new(Mutex::new(form)),
            rate_hz: DEFAULT_RATE_HZ,
            last_error: None,
            repeat: None,
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn type_name(&self) -> &str {
        &self.schema.name
    }

    pub fn latching(&self) -> bool {
        self.publisher.latching()
    }

    pub fn set_latch(&self, on: bool) {
        self.publisher.set_latch(on);
    }

    /// Builds a message from the current control values and publishes it.
    /// Failures land in `last_error` instead of tearing the panel down.
    pub fn send_once(&mut self) {
        match self.build_message() {
            Ok(message) => {
                self.publisher.publish(message);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat.as_ref().map(RepeatHandle::is_running).unwrap_or(false)
    }

    /// Spawns the repeat thread. The interval is fixed here from the current
    /// rate; editing the rate afterwards only affects the next start. Calling
    /// this while a loop is already running does nothing.
    pub fn start_repeat(&mut self) -> Result<(), PanelError> {
        if self.is_repeating() {
            return Ok(());
        }
        let interval = Duration::from_secs_f64(1.0 / self.rate_hz.max(1) as f64);
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let form = Arc::clone(&self.form);
        let registry = Arc::clone(&self.registry);
        let schema = self.schema.clone();
        let publisher = self.publisher.clone();
        let topic = self.topic.clone();
        let handle = thread::Builder::new()
            .name(format!("repeat-{}", self.topic))
            .spawn(move || {
                log::debug!("repeat loop on '{topic}' every {interval:?}");
                while flag.load(Ordering::Relaxed) {
                    let snapshot = match form.lock() {
                        Ok(guard) => guard.clone(),
                        Err(_) => break,
                    };
                    match apply_form(&registry, &schema, &snapshot) {
                        Ok(message) => publisher.publish(message),
                        Err(err) => log::warn!("repeat loop on '{topic}': {err}"),
                    }
                    thread::sleep(interval);
                }
                log::debug!("repeat loop on '{topic}' finished");
            })?;
        self.repeat = Some(RepeatHandle {
            running,
            handle,
        });
        Ok(())
    }

    /// Flags the repeat thread to stop and hands back its handle. The loop
    /// notices within one interval; callers that need to wait can join the
    /// returned handle, dropping it just lets the thread run out.
    pub fn stop_repeat(&mut self) -> Option<RepeatHandle> {
        let handle = self.repeat.take();
        if let Some(handle) = &handle {
            handle.stop();
        }
        handle
    }

    fn build_message(&self) -> Result<MessageValue, PanelError> {
        let snapshot = match self.form.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Ok(apply_form(&self.registry, &self.schema, &snapshot)?)
    }
}

impl Drop for PublishPanel {
    fn drop(&mut self) {
        // No join here; the loop exits on its own within one interval.
        self.stop_repeat();
    }
}

#[derive(Debug)]
pub struct RepeatHandle {
    running: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

impl RepeatHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn join(self) {
        let _ = self.handle.join();
    }
}
