//! Worker events as plain console lines.

use jobqueue_core::domain::WorkerEvent;
use jobqueue_core::ports::EventSink;

/// Prints failures to stdout; everything else is left to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEventSink;

impl EventSink for ConsoleEventSink {
    fn emit(&self, event: &WorkerEvent) {
        match event {
            WorkerEvent::Failed { error, .. } => {
                println!("{error}");
                if let Some(cause) = &error.cause {
                    println!("{cause}");
                }
            }
            WorkerEvent::Unexpected { error, .. } => {
                println!("Unexpected exception during job execution: {error}");
                if let Some(cause) = error.failure().and_then(|f| f.cause.as_ref()) {
                    println!("{cause}");
                }
            }
            _ => {}
        }
    }
}
