use jiff::Timestamp;

/// Clock behind cache TTL decisions.
///
/// Production reads the system clock. Under the `mock-time` feature the
/// instance wraps a shared settable instant instead, so tests can cross
/// TTL boundaries without sleeping. Clones observe the same instant.
#[derive(Clone)]
pub struct TimeSource {
    #[cfg(feature = "mock-time")]
    now: std::sync::Arc<std::sync::Mutex<Timestamp>>,
}

#[cfg(not(feature = "mock-time"))]
impl TimeSource {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {}
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(feature = "mock-time")]
impl TimeSource {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: std::sync::Arc::new(std::sync::Mutex::new(start)),
        }
    }

    pub fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }

    /// Move the mocked clock forward.
    pub fn advance(&self, span: jiff::Span) {
        *self.now.lock().unwrap() += span;
    }
}
