//! Line observer that forwards output to the deploy event sink

use std::sync::Arc;

use tracing::trace;

use crate::domain::ports::{DeployEvent, DeployEventSink, LineSource, LogObserver};
use crate::domain::value_objects::LogEvent;

/// Forwards non-blank sanitized lines as `DeployEvent::Line`
pub struct EventLineObserver {
    sink: Arc<dyn DeployEventSink>,
    source: LineSource,
}

impl EventLineObserver {
    pub fn new(sink: Arc<dyn DeployEventSink>, source: LineSource) -> Self {
        Self { sink, source }
    }
}

impl LogObserver for EventLineObserver {
    fn on_line(&self, event: LogEvent) {
        trace!(source = self.source.name(), channel = event.channel.name(), line = %event.sanitized);
        if event.is_blank() || !self.sink.wants_detailed_events() {
            return;
        }
        self.sink.on_event(DeployEvent::Line {
            source: self.source,
            event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoopEventSink;
    use crate::domain::value_objects::Channel;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<DeployEvent>>);

    impl DeployEventSink for Recorder {
        fn on_event(&self, event: DeployEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn blank_lines_are_dropped() {
        let sink = Arc::new(Recorder::default());
        let observer = EventLineObserver::new(sink.clone(), LineSource::Remote);
        observer.on_line(LogEvent::new(Channel::Out, "\u{1b}[2K"));
        observer.on_line(LogEvent::new(Channel::Out, "ready"));
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn summary_sinks_get_no_lines() {
        let observer = EventLineObserver::new(Arc::new(NoopEventSink), LineSource::Build);
        observer.on_line(LogEvent::new(Channel::Err, "x"));
    }
}
