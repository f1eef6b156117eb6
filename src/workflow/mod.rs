//! Interactive selection workflow.
//!
//! The session is an explicit state machine:
//! `scanning -> displaying -> selecting -> executing -> complete`, with a
//! terminal `error` state reachable from `scanning`. [`Workflow::handle`]
//! is the pure transition function; [`run`] performs the I/O it asks for
//! and talks to a [`Frontend`].

mod runner;
mod state;
mod transition;

pub use runner::{run, Frontend};
pub use state::{Completion, Phase, Workflow};
pub use transition::{Effect, Event};
