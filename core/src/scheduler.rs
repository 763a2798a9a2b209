//! Serializes preview renders so at most one typesetting pass runs at a time.
//!
//! Requests that arrive while a render is in flight land in a one-slot
//! mailbox; a newer request overwrites the older one. When the engine
//! finishes, the mailbox content (if any) is submitted next, so the last
//! submitted text always ends up rendered.

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("typesetting engine is not loaded")]
    EngineNotReady,
    #[error("typesetting failed: {0}")]
    Typeset(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Hand this text to the engine now.
    Submit(String),
    /// A render is running; the text is parked as the pending value.
    Coalesced,
    /// The engine has not loaded; the text is parked until it does.
    AwaitingEngine,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub next: Option<String>,
    pub error: Option<RenderError>,
}

#[derive(Clone, Debug, Default)]
pub struct RenderScheduler {
    engine_ready: bool,
    in_flight: Option<String>,
    pending: Option<String>,
    rendered: Option<String>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Last text the engine finished without error.
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref()
    }

    pub fn request(&mut self, text: impl Into<String>) -> Dispatch {
        let text = text.into();
        if !self.engine_ready {
            self.pending = Some(text);
            return Dispatch::AwaitingEngine;
        }
        if self.in_flight.is_some() {
            self.pending = Some(text);
            return Dispatch::Coalesced;
        }
        self.in_flight = Some(text.clone());
        Dispatch::Submit(text)
    }

    /// Marks the engine as loaded. Returns the text parked before load, which
    /// the caller must submit. Subsequent calls are no-ops.
    pub fn engine_ready(&mut self) -> Option<String> {
        if self.engine_ready {
            return None;
        }
        self.engine_ready = true;
        self.take_pending()
    }

    /// Records the outcome of the in-flight render. A failed text is not
    /// retried, but a newer pending value is still submitted.
    pub fn complete(&mut self, outcome: Result<(), RenderError>) -> Completion {
        let finished = self.in_flight.take();
        let error = match outcome {
            Ok(()) => {
                if finished.is_some() {
                    self.rendered = finished;
                }
                None
            }
            Err(err) => Some(err),
        };
        Completion {
            next: self.take_pending(),
            error,
        }
    }

    fn take_pending(&mut self) -> Option<String> {
        let next = self.pending.take()?;
        self.in_flight = Some(next.clone());
        Some(next)
    }
}
