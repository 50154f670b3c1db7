pub mod event;
pub mod integrator;
pub mod runner;

pub use event::{Phase, Termination};
pub use integrator::euler_step;
pub use runner::{simulate_fall, simulate_trajectory, Descent, Impact, Snapshot};
