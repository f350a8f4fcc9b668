//! Recording backend for unit and integration tests.
//!
//! Captures every dispatched [`Instruction`] into a shared log instead of
//! touching the OS, with an optional always-fail mode for exercising the
//! degrade path.  Always compiled (not `#[cfg(test)]`) so the integration
//! tests in `tests/` can use it through the public API.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use relay_core::Instruction;

use super::{InjectionError, InputBackend};

/// An [`InputBackend`] that records instead of injecting.
pub struct RecordingBackend {
    executed: Arc<Mutex<Vec<Instruction>>>,
    should_fail: bool,
}

impl RecordingBackend {
    /// A backend that records every instruction and always succeeds.
    pub fn new() -> Self {
        Self {
            executed: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    /// A backend that fails every execute call without recording anything,
    /// simulating a child whose pipe has died.
    pub fn failing() -> Self {
        Self {
            executed: Arc::new(Mutex::new(Vec::new())),
            should_fail: true,
        }
    }

    /// Shared handle to the execution log.  Clone it out before boxing the
    /// backend into an [`super::Injector`].
    pub fn log(&self) -> Arc<Mutex<Vec<Instruction>>> {
        Arc::clone(&self.executed)
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn execute(&mut self, instruction: &Instruction) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::BackendExited { tool: "recording" });
        }
        self.executed.lock().unwrap().push(*instruction);
        Ok(())
    }
}
