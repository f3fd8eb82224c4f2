//! The interactive workflow as an explicit finite-state machine.
//!
//! ```text
//! SOURCE_INPUT ─▶ FORMAT_SELECTION ─▶ MERGE_MODE_SELECTION ─▶ FILES_SELECTION
//!      ▲                                                             │
//!      │                                                             ▼
//!   COMPLETE ◀──────────────────────────────────────────────── PROCESSING
//!
//!   ERROR  (entered from anywhere, exits to the origin or SOURCE_INPUT)
//! ```
//!
//! [`WorkflowStateMachine`] only knows about states and history; all answers
//! collected along the way live in its [`WorkflowContext`].

mod context;
mod state;

pub use context::WorkflowContext;
pub use state::{Transition, WorkflowState, WorkflowStateMachine};
