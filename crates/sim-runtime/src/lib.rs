#![deny(warnings)]

//! Runtime for Starship Legacy: the state store, its notification feed and
//! the async session that drives generation ticks.

pub mod autosave;
pub mod clock;
pub mod notifications;
pub mod session;
pub mod store;

pub use autosave::AutosaveSink;
pub use clock::{Clock, ManualClock, SystemClock};
pub use notifications::NotificationCenter;
pub use session::{spawn_session, SessionError, SessionHandle};
pub use store::{GameStore, SnapshotSink};
