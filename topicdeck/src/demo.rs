//! Background talkers that feed deterministic signals onto the bus, so the
//! deck has live topics without any external data source.

use msgschema::{MessageValue, SchemaRegistry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use topicbus::MessageBus;

const TICK: Duration = Duration::from_millis(50);

pub struct TalkerHandle {
    running: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

impl TalkerHandle {
    pub fn stop(self) {
        self.running.store(false, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}

/// Publishes a sine-driven Twist on `/demo/twist` and an Imu on `/demo/imu`.
pub fn spawn_demo_talkers(
    bus: &MessageBus<MessageValue>,
    registry: &Arc<SchemaRegistry>,
) -> Result<Vec<TalkerHandle>, Box<dyn std::error::Error>> {
    let twist = spawn_talker(
        bus,
        registry,
        "/demo/twist",
        "geometry_msgs/Twist",
        |message, t| {
            set_float(message, "linear.x", t.sin());
            set_float(message, "angular.z", (t * 0.5).cos());
        },
    )?;
    let imu = spawn_talker(
        bus,
        registry,
        "/demo/imu",
        "sensor_msgs/Imu",
        |message, t| {
            set_float(message, "angular_velocity.z", (t * 2.0).sin());
            set_float(message, "linear_acceleration.z", 9.81 + 0.2 * t.cos());
        },
    )?;
    Ok(vec![twist, imu])
}

fn spawn_talker<F>(
    bus: &MessageBus<MessageValue>,
    registry: &Arc<SchemaRegistry>,
    topic: &str,
    type_name: &str,
    update: F,
) -> Result<TalkerHandle, Box<dyn std::error::Error>>
where
    F: Fn(&mut MessageValue, f64) + Send + 'static,
{
    let schema = registry.resolve(type_name)?.clone();
    let publisher = bus.advertise(topic, type_name)?;
    let registry = Arc::clone(registry);
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    let name = format!("talker{}", topic.replace('/', "-"));
    let handle = thread::Builder::new().name(name).spawn(move || {
        let mut message = MessageValue::new_default(&registry, &schema);
        let mut t = 0.0f64;
        while flag.load(Ordering::Relaxed) {
            update(&mut message, t);
            publisher.publish(message.clone());
            t += TICK.as_secs_f64();
            thread::sleep(TICK);
        }
    })?;
    Ok(TalkerHandle { running, handle })
}

fn set_float(message: &mut MessageValue, path: &str, value: f64) {
    if let Some(slot) = message.path_mut(path) {
        *slot = MessageValue::Float(value);
    }
}
