//! Game logic
//!
//! Everything here sits above the platform traits and never talks to a
//! concrete engine:
//! - Single-threaded and event-driven (one event at a time, no locking)
//! - All persistent state lives in `SessionState`
//! - Host calls are synchronous; fades and cues are fire-and-forget

pub mod ball;
pub mod contact;
pub mod geometry;
pub mod session;
pub mod state;
pub mod table;

pub use ball::{Projectile, ThrowableBody};
pub use contact::{ContactOutcome, ContactRegistry, FadeTiming, fade_out};
pub use geometry::{impulse_vector, position_from_transform, world_pose};
pub use session::{Session, SessionEvent, TapOutcome};
pub use state::{SessionPhase, SessionState};
pub use table::{PlacedSurface, PlacementSurface, SubpartKind, attach_physics};
