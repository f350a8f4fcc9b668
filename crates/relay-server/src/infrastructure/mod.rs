//! Infrastructure layer: WebSocket server, static asset delivery, and the
//! OS injection backends.

pub mod injection;
pub mod static_files;
pub mod ws_server;

pub use static_files::run_static_server;
pub use ws_server::run_server;
