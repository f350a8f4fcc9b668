//! RelayService: transport messages in, injected instructions out.
//!
//! This use case sits between the WebSocket sessions and the process-wide
//! [`Injector`].  For each transport message it runs the whole protocol
//! pipeline — allow-list filter, line split, per-line parse — and dispatches
//! the surviving instructions in arrival order.
//!
//! # Shared-injector discipline
//!
//! Every session routes through the same injector; there is no per-client
//! isolation and no arbitration beyond last-writer-wins.  The injector lives
//! behind a `tokio::sync::Mutex`, and the lock is held for one message's
//! whole instruction batch so that a batch from one session is never
//! interleaved with another session's.  Across messages, ordering between
//! sessions is whatever the runtime delivers.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use relay_core::protocol::command::parse_message;

use crate::infrastructure::injection::Injector;

/// The relay use case: owns the shared reference to the injector and turns
/// raw transport messages into injected input events.
#[derive(Clone)]
pub struct RelayService {
    injector: Arc<Mutex<Injector>>,
}

impl RelayService {
    /// Creates a service around the process-wide injector.
    pub fn new(injector: Arc<Mutex<Injector>>) -> Self {
        Self { injector }
    }

    /// Handles one transport message end to end.
    ///
    /// Returns the number of instructions forwarded to the injector.  A
    /// message rejected by the allow-list, or containing only unparseable
    /// lines, forwards nothing — protocol failures are silent by design and
    /// never surface to the client.
    pub async fn handle_message(&self, payload: &str) -> usize {
        let instructions = parse_message(payload);
        if instructions.is_empty() {
            return 0;
        }

        let mut injector = self.injector.lock().await;
        for instruction in &instructions {
            injector.dispatch(instruction).await;
        }

        debug!(count = instructions.len(), "forwarded instruction batch");
        instructions.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::injection::mock::RecordingBackend;
    use relay_core::Instruction;

    fn make_service() -> (RelayService, std::sync::Arc<std::sync::Mutex<Vec<Instruction>>>) {
        let backend = RecordingBackend::new();
        let log = backend.log();
        let injector = Arc::new(Mutex::new(Injector::with_backend(Box::new(backend))));
        (RelayService::new(injector), log)
    }

    #[tokio::test]
    async fn test_valid_batch_is_dispatched_in_line_order() {
        // Arrange
        let (service, log) = make_service();

        // Act
        let count = service.handle_message("M 10 -5\nLC 1\nLC 0").await;

        // Assert
        assert_eq!(count, 3);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Instruction::MoveRelative { dx: 10, dy: -5 },
                Instruction::LeftButton { pressed: true },
                Instruction::LeftButton { pressed: false },
            ]
        );
    }

    #[tokio::test]
    async fn test_message_with_disallowed_character_dispatches_nothing() {
        // Arrange: first line is well-formed, but the filter runs over the
        // whole message before any line is interpreted.
        let (service, log) = make_service();

        // Act
        let count = service.handle_message("M 1 2\nLC 1!").await;

        // Assert
        assert_eq!(count, 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_verb_is_a_no_op() {
        let (service, log) = make_service();
        let count = service.handle_message("Z 1 2").await;
        assert_eq!(count, 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_backend_does_not_propagate_and_degrades_silently() {
        // Arrange
        let backend = RecordingBackend::failing();
        let injector = Arc::new(Mutex::new(Injector::with_backend(Box::new(backend))));
        let service = RelayService::new(injector);

        // Act: neither call may panic or return an error.
        let first = service.handle_message("M 1 2").await;
        let second = service.handle_message("M 3 4").await;

        // Assert: instructions still parse and are forwarded; the injector
        // absorbs the backend failure.
        assert_eq!(first, 1);
        assert_eq!(second, 1);
    }

    #[tokio::test]
    async fn test_service_with_idle_injector_accepts_messages() {
        // Unsupported platform: commands are discarded, not errors.
        let injector = Arc::new(Mutex::new(Injector::idle()));
        let service = RelayService::new(injector);
        assert_eq!(service.handle_message("M 1 2\nW -120").await, 2);
    }

    #[tokio::test]
    async fn test_key_chord_round_trip() {
        let (service, log) = make_service();
        service.handle_message("K 32 1\nK 32 0").await;
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Instruction::Key { code: 32, pressed: true },
                Instruction::Key { code: 32, pressed: false },
            ]
        );
    }
}
