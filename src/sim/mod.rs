//! Bouncing-ball simulation
//!
//! Frame-driven and deterministic for a given seed:
//! - Velocities are in pixels per frame
//! - Seeded RNG only
//! - No rendering dependencies beyond emitting draw commands

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionResult, ContactKind, Endpoint, PredictedCollision, ball_segment_collision,
    bounce_off_bounds, predict_collision, resolve_collision,
};
pub use state::{Ball, BounceScene, SegmentHit};
pub use tick::{TickInput, tick};
