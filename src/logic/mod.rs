//! Frame-driven logic: the scheduler, the particle field and the authoring
//! session that ties the scene to its readers.

pub mod particles;
pub mod scheduler;
pub mod session;

pub use particles::{ParticleLoop, ParticleSimulator};
pub use scheduler::{CancellationToken, FrameClock, ManualClock, Scheduler, SystemClock};
pub use session::SceneSession;
