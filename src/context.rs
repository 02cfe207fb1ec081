use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-request diagnostics context, threaded through every component that logs
#[derive(Debug, Clone)]
pub struct RequestContext {
    id: Uuid,
    requested_url: String,
    started: Instant,
}

impl RequestContext {
    pub fn new(requested_url: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            requested_url: requested_url.to_string(),
            started: Instant::now(),
        }
    }

    /// The URL exactly as the caller supplied it
    pub fn requested_url(&self) -> &str {
        &self.requested_url
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable
        let id = self.id.simple().to_string();
        f.write_str(&id[..8])
    }
}
