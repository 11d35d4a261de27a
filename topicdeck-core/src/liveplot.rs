use crate::PanelError;
use msgschema::MessageValue;
use std::collections::VecDeque;
use std::fmt;
use topicbus::{MessageBus, Subscription};

/// How many samples a series keeps unless configured otherwise.
pub const DEFAULT_HISTORY: usize = 100;

const MIN_HISTORY: usize = 2;

/// `topic:field[:field...]` selection of scalar fields to chart. Fields use
/// dotted paths into the message, e.g. `/cmd_vel:linear.x:angular.z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotSpec {
    pub topic: String,
    pub fields: Vec<String>,
}

impl PlotSpec {
    pub fn parse(text: &str) -> Result<PlotSpec, PanelError> {
        let mut parts = text.split(':');
        let topic = parts.next().unwrap_or_default().trim();
        let fields: Vec<String> = parts
            .map(|field| field.trim().to_string())
            .filter(|field| !field.is_empty())
            .collect();
        if topic.is_empty() || fields.is_empty() {
            return Err(PanelError::PlotSpec(text.to_string()));
        }
        Ok(PlotSpec {
            topic: topic.to_string(),
            fields,
        })
    }
}

impl fmt::Display for PlotSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.topic, self.fields.join(":"))
    }
}

pub struct FieldSeries {
    pub path: String,
    pub points: VecDeque<(f64, f64)>,
}

/// Chart state for one topic. `pump` must be called from the thread that
/// owns the panel; messages queue up in the subscription between calls.
pub struct LivePlotPanel {
    spec: PlotSpec,
    subscription: Subscription<MessageValue>,
    history: usize,
    pub series: Vec<FieldSeries>,
    samples_seen: u64,
}

impl LivePlotPanel {
    pub fn new(bus: &MessageBus<MessageValue>, spec: PlotSpec, history: usize) -> Self {
        let subscription = bus.subscribe_untyped(&spec.topic);
        let series = spec
            .fields
            .iter()
            .map(|field| FieldSeries {
                path: field.clone(),
                points: VecDeque::new(),
            })
            .collect();
        Self {
            spec,
            subscription,
            history: history.max(MIN_HISTORY),
            series,
            samples_seen: 0,
        }
    }

    pub fn spec(&self) -> &PlotSpec {
        &self.spec
    }

    pub fn history(&self) -> usize {
        self.history
    }

    /// Drains everything queued on the subscription into the series and
    /// returns how many messages arrived. Fields that are missing or not
    /// numeric chart as NaN, which renders as a gap.
    pub fn pump(&mut self) -> usize {
        let mut drained = 0;
        while let Some(message) = self.subscription.try_recv() {
            let x = self.samples_seen as f64;
            self.samples_seen += 1;
            for series in &mut self.series {
                let y = message
                    .path(&series.path)
                    .and_then(MessageValue::as_f64)
                    .unwrap_or(f64::NAN);
                series.points.push_back((x, y));
                while series.points.len() > self.history {
                    series.points.pop_front();
                }
            }
            drained += 1;
        }
        drained
    }
}
