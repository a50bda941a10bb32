//! Reporting boundary for values published during a run.

use tracing::info;

/// Receives labelled values worth showing to the user
pub trait Reporter {
    fn publish_value(&self, label: &str, value: &str);
}

/// Forwards published values to `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn publish_value(&self, label: &str, value: &str) {
        info!(target: "whittle", label, "{}", value);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn publish_value(&self, _label: &str, _value: &str) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::Reporter;

    /// Keeps every published value
    #[derive(Debug, Default)]
    pub struct RecordingReporter {
        pub published: RefCell<Vec<(String, String)>>,
    }

    impl RecordingReporter {
        pub fn labels(&self) -> Vec<String> {
            self.published
                .borrow()
                .iter()
                .map(|(label, _)| label.clone())
                .collect()
        }
    }

    impl Reporter for RecordingReporter {
        fn publish_value(&self, label: &str, value: &str) {
            self.published
                .borrow_mut()
                .push((label.to_string(), value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingReporter;
    use super::*;

    #[test]
    fn test_reporters() {
        let recording = RecordingReporter::default();
        let reporters: [&dyn Reporter; 3] = [&TracingReporter, &NoopReporter, &recording];
        for reporter in reporters {
            reporter.publish_value("label", "value");
        }
        assert_eq!(recording.labels(), vec!["label".to_string()]);
    }
}
