// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds the terminal and the cli on top.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod text;
pub mod ui;

pub use dispatcher::{Clock, Dispatcher, Observer, SnapshotLog, SystemClock};
pub use event::{Command, Event, Key};
pub use session::SessionState;
pub use snapshot::Snapshot;
