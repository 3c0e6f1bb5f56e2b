//! Test helper utilities for integration tests

use once_cell::sync::Lazy;
use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for tests (only once)
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
});

/// Initialize tracing for tests
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// Collects everything the SDK logs on the current thread.
///
/// Install with [`LogCapture::install`]; events are captured until the
/// returned guard is dropped. `#[tokio::test]` runs on a single thread, so
/// all SDK events of the test land here.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Create an empty capture buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route all events on this thread into the buffer.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Everything captured so far.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("log buffer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Writer handed out by [`LogCapture`].
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

/// Assert that a JSON value contains the expected fields
pub fn assert_json_contains(json: &Value, expected: &Value) {
    for (key, value) in expected.as_object().expect("Expected object") {
        assert!(json.get(key).is_some(), "Missing key '{}' in body", key);
        if value.is_object() {
            assert_json_contains(&json[key], value);
        } else {
            assert_eq!(
                &json[key], value,
                "Mismatch for key '{}': expected {:?}, got {:?}",
                key, value, json[key]
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_capture_collects_events() {
        let capture = LogCapture::new();
        {
            let _guard = capture.install();
            tracing::info!(target: "capture_test", "first line");
            tracing::debug!("second line");
        }
        tracing::info!("after the guard");

        let logs = capture.contents();
        assert!(logs.contains("first line"));
        assert!(logs.contains("second line"));
        assert!(!logs.contains("after the guard"));
    }

    #[test]
    fn test_assert_json_contains_nested() {
        let body = json!({"model": "a", "extra": 1, "nested": {"x": true, "y": 2}});
        assert_json_contains(&body, &json!({"model": "a", "nested": {"x": true}}));
    }
}
