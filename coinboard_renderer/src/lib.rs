//! Renderer side of coinboard.
//!
//! Receives quote results from the provider and keeps the slot board current:
//! - `barrier` — collects `initial-batch` results until a batch is complete.
//! - `board` — display slots and their text rendering.
//! - `scheduler` — paced `request-refresh` messages for stale slots.
//! - `renderer` — maps incoming messages to barrier, board and scheduler actions.
//! - `sender` — `init` request and keep-alive pings.
pub mod barrier;
pub mod board;
pub mod renderer;
pub mod scheduler;
pub mod sender;
