//! Search fetch controller: state machine, timers and runtime session.

mod debounce;
mod machine;
mod scroll;
mod session;
mod state;

pub use debounce::Debouncer;
pub use machine::{Effect, FetchController, FetchTicket, PageOutcome};
pub use scroll::{ScrollListener, ScrollPosition};
pub use session::{fetch_page, SearchSession};
pub use state::{FetchState, SearchSnapshot};
