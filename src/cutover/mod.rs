// ABOUTME: Cutover orchestration using the type state pattern.
// ABOUTME: Exports the session, state markers, engine, and polling primitives.

mod convergence;
mod engine;
mod error;
mod readiness;
mod replicate;
mod session;
mod state;
mod transitions;
mod weights;

pub use convergence::await_convergence;
pub use engine::run_cutover;
pub use error::CutoverError;
pub use readiness::wait_until_ready;
pub use replicate::replicate;
pub use session::Session;
pub use state::{
    Decommissioned, GreenPublished, Initialized, Ready, Replicated, ResourceRetired, Shifted,
};
pub use weights::{clamp, next_weights};
