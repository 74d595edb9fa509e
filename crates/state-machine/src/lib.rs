//! Lightweight finite state machine for real-time entity behaviour.
//!
//! States are plain structs implementing [`State`]. The [`StateMachine`]
//! owns them, tracks the active one, and runs `enter`/`update`/`exit` hooks
//! as transitions are requested.
//!
//! - **Frame driven**: `update` receives the elapsed seconds since last frame
//! - **Shared countdown**: a single [`Timer`] is owned by the machine and
//!   handed to every hook, so states can arm it on entry and poll it later
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`State`]: Core trait for all states
//! - [`Transition`]: Result of an update, either stay or switch to a key
//! - [`StateMachine`]: Registry of keyed states plus the active pointer
//! - [`Timer`]: Countdown decremented once per machine update

pub mod machine;
pub mod state;
pub mod timer;

// Re-export core types for ergonomic API
pub use machine::StateMachine;
pub use state::{State, Transition};
pub use timer::Timer;
