//! OS input injection: one backend per platform behind one trait.
//!
//! The relay owns exactly one injection backend, selected once at startup
//! from the host platform and never re-selected:
//!
//! | Platform | Backend | Shape |
//! |----------|---------|-------|
//! | Windows  | [`powershell::PowershellBackend`] | persistent pipe |
//! | Linux    | [`xdotool::XdotoolBackend`]       | persistent pipe |
//! | macOS    | [`osascript::OsascriptBackend`]   | one process per key event |
//! | other    | none                              | every command discarded |
//!
//! The persistent-pipe backends keep a single child process alive for the
//! whole server lifetime and stream one textual mini-command per line to its
//! stdin; the child performs the actual OS call.  Nothing is read back —
//! success is assumed, and the child's stdout/stderr pass through to the host
//! console for diagnostics.
//!
//! # Lifecycle
//!
//! Per injector: `Uninitialized → Starting → Ready → Degraded`, where
//! `Degraded` is terminal.  A spawn failure (tool not installed) or a write
//! against a dead child degrades the injector for the remainder of the
//! process; subsequent instructions are discarded silently and the gateway
//! keeps accepting connections.  There is no retry and no respawn.

pub mod mock;
pub mod osascript;
pub mod powershell;
pub mod xdotool;

use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use tracing::{info, warn};

use relay_core::Instruction;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors raised by the injection backends.
///
/// None of these are fatal to the server: the [`Injector`] catches them, logs,
/// and degrades.  They exist as a typed enum so the degrade path can say what
/// actually happened.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The backend tool could not be started (usually: not installed).
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The persistent child exited; its input pipe is gone.
    #[error("{tool} exited; its command pipe is closed")]
    BackendExited { tool: &'static str },

    /// The child was spawned without a usable stdin handle.
    #[error("{tool} has no stdin pipe")]
    StdinUnavailable { tool: &'static str },

    /// A write to the child's stdin failed.
    #[error("write to {tool} stdin failed: {source}")]
    Pipe {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
}

// ── Backend trait ─────────────────────────────────────────────────────────────

/// Platform-agnostic injection capability.
///
/// Each variant turns a typed [`Instruction`] into an OS input event, by
/// whatever means its platform offers.  Implementations are free to ignore
/// instructions their platform cannot express (the osascript backend honors
/// only key events); ignoring is not an error.
#[async_trait]
pub trait InputBackend: Send {
    /// Short tool name for log messages.
    fn name(&self) -> &'static str;

    /// Executes one instruction against the OS.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the backend process is gone or the pipe
    /// write fails.  The caller treats any error as terminal for the backend.
    async fn execute(&mut self, instruction: &Instruction) -> Result<(), InjectionError>;
}

// ── Persistent child plumbing ─────────────────────────────────────────────────

/// A spawned child with a piped stdin, shared by both persistent-pipe
/// backends.
///
/// stdout/stderr are inherited so the tool's own diagnostics land on the host
/// console; they are never parsed.
pub(crate) struct PipeChild {
    tool: &'static str,
    child: Child,
    stdin: ChildStdin,
}

impl PipeChild {
    /// Spawns `program args...` with a piped stdin.
    pub(crate) fn spawn(
        tool: &'static str,
        program: &str,
        args: &[&str],
    ) -> Result<Self, InjectionError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| InjectionError::Spawn { tool, source })?;

        let stdin = child
            .stdin
            .take()
            .ok_or(InjectionError::StdinUnavailable { tool })?;

        Ok(Self { tool, child, stdin })
    }

    /// Writes one line to the child's stdin.
    ///
    /// Every write is preceded by a liveness check on the child: writing into
    /// a pipe whose far end has exited must surface as an [`InjectionError`],
    /// never as a panic or an ignored loss.
    pub(crate) async fn write_line(&mut self, line: &str) -> Result<(), InjectionError> {
        let exited = self.child.try_wait().map(|s| s.is_some()).unwrap_or(true);
        if exited {
            return Err(InjectionError::BackendExited { tool: self.tool });
        }

        let tool = self.tool;
        let pipe_err = |source| InjectionError::Pipe { tool, source };

        self.stdin.write_all(line.as_bytes()).await.map_err(pipe_err)?;
        self.stdin.write_all(b"\n").await.map_err(pipe_err)?;
        self.stdin.flush().await.map_err(pipe_err)?;
        Ok(())
    }
}

// ── Injector state machine ────────────────────────────────────────────────────

/// Lifecycle state of the process-wide injector.
///
/// `Degraded` is terminal: there is no transition back to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    /// No backend selected (unsupported platform).  Commands are discarded.
    Uninitialized,
    /// Backend spawn in flight.
    Starting,
    /// Backend alive and accepting instructions.
    Ready,
    /// Backend failed to start or died mid-stream.  Commands are discarded
    /// for the remainder of the process lifetime.
    Degraded,
}

/// The process-wide injector: owns the single active backend and its state.
///
/// Constructed once at startup and shared (behind a `tokio::sync::Mutex`) by
/// every connection.  [`Injector::dispatch`] is infallible from the caller's
/// point of view: backend failures are absorbed here, logged, and turn into
/// permanent silent discard — injector health must never take down the
/// connection-accepting path.
pub struct Injector {
    backend: Option<Box<dyn InputBackend>>,
    state: BackendState,
}

impl Injector {
    /// An injector with no backend at all (unsupported platform).
    pub fn idle() -> Self {
        Self {
            backend: None,
            state: BackendState::Uninitialized,
        }
    }

    /// An injector wrapping an already-constructed backend.
    ///
    /// Used by platform selection and by tests that substitute a recording
    /// backend.
    pub fn with_backend(backend: Box<dyn InputBackend>) -> Self {
        Self {
            backend: Some(backend),
            state: BackendState::Ready,
        }
    }

    /// Selects and starts the backend for the machine the server runs on.
    pub async fn for_host_platform() -> Self {
        Self::for_platform(std::env::consts::OS).await
    }

    /// Selects and starts the backend for the named platform
    /// (`std::env::consts::OS` values).
    ///
    /// A spawn failure logs a diagnostic and yields a `Degraded` injector; an
    /// unrecognized platform yields an `Uninitialized` one.  Neither is an
    /// error to the caller.
    pub async fn for_platform(os: &str) -> Self {
        let mut injector = Self::idle();
        match os {
            "windows" => {
                injector.state = BackendState::Starting;
                let result = powershell::PowershellBackend::spawn()
                    .await
                    .map(|b| Box::new(b) as Box<dyn InputBackend>);
                injector.finish_start("powershell (persistent pipe)", result);
            }
            "linux" => {
                injector.state = BackendState::Starting;
                let result =
                    xdotool::XdotoolBackend::spawn().map(|b| Box::new(b) as Box<dyn InputBackend>);
                injector.finish_start("xdotool (persistent pipe)", result);
            }
            "macos" => {
                // Nothing to spawn up front: the one-shot backend starts a
                // process per key event.
                injector.state = BackendState::Starting;
                injector.finish_start(
                    "osascript (one process per key event)",
                    Ok(Box::new(osascript::OsascriptBackend::new())),
                );
            }
            other => {
                info!(
                    platform = other,
                    "no input backend for this platform; commands will be discarded"
                );
            }
        }
        injector
    }

    /// Completes the `Starting` phase with the outcome of the backend spawn.
    fn finish_start(
        &mut self,
        label: &str,
        result: Result<Box<dyn InputBackend>, InjectionError>,
    ) {
        match result {
            Ok(backend) => {
                info!("input backend: {label}");
                self.backend = Some(backend);
                self.state = BackendState::Ready;
            }
            Err(e) => {
                warn!("input backend unavailable ({label}): {e}");
                self.state = BackendState::Degraded;
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BackendState {
        self.state
    }

    /// Executes one instruction against the active backend.
    ///
    /// Silently discards the instruction unless the injector is `Ready`.  A
    /// backend error is logged and transitions the injector to `Degraded`;
    /// it is never propagated to the caller.
    pub async fn dispatch(&mut self, instruction: &Instruction) {
        if self.state != BackendState::Ready {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            self.state = BackendState::Degraded;
            return;
        };

        if let Err(e) = backend.execute(instruction).await {
            warn!(
                backend = backend.name(),
                "injection failed, disabling backend for the rest of this process: {e}"
            );
            self.state = BackendState::Degraded;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
