//! Task driver
//!
//! An [`AnalysisTask`] consumes one event at a time and fills its own
//! [`HistogramRegistry`]. [`run`] is the event loop: events are processed
//! strictly in order, each one completely before the next.

use crate::error::AnalysisError;
use crate::histogram::HistogramRegistry;
use crate::AnalysisResult;
use serde::de::DeserializeOwned;
use std::io::BufRead;
use std::time::{Duration, Instant};

/// Per-event analysis with an owned histogram registry
pub trait AnalysisTask {
    type Event;

    fn name(&self) -> &str;

    /// Process one event, filling histograms
    fn process(&mut self, event: &Self::Event) -> AnalysisResult<()>;

    fn registry(&self) -> &HistogramRegistry;

    /// Called once after the last event
    fn finish(&mut self) {}
}

/// Outcome of one [`run`]
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub task: String,
    pub events: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn events_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.events as f64 / secs
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Run [{}]:\n\
             ├─ Events: {}\n\
             ├─ Elapsed: {:.3}s\n\
             └─ Rate: {:.0} events/s",
            self.task,
            self.events,
            self.elapsed.as_secs_f64(),
            self.events_per_second()
        )
    }
}

/// Feed every event through `task`, then call [`AnalysisTask::finish`]
pub fn run<T, I>(task: &mut T, events: I) -> AnalysisResult<RunSummary>
where
    T: AnalysisTask,
    I: IntoIterator<Item = T::Event>,
{
    let start = Instant::now();
    let mut count = 0usize;
    for event in events {
        task.process(&event)?;
        count += 1;
        if count % 10_000 == 0 {
            log::debug!("{}: {} events processed", task.name(), count);
        }
    }
    task.finish();

    let summary = RunSummary {
        task: task.name().to_string(),
        events: count,
        elapsed: start.elapsed(),
    };
    log::info!(
        "{}: processed {} events in {:.3}s",
        summary.task,
        summary.events,
        summary.elapsed.as_secs_f64()
    );
    Ok(summary)
}

/// Decode one JSON event per line, skipping blank lines
pub fn read_json_lines<E, R>(reader: R) -> AnalysisResult<Vec<E>>
where
    E: DeserializeOwned,
    R: BufRead,
{
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|e| AnalysisError::Input {
            line: i + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}
