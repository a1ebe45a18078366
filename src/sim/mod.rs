//! Simulation core
//!
//! All gameplay logic lives here. This module is pure:
//! - Time only enters through the `dt` passed to [`tick`]
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod geometry;
pub mod obstacles;
pub mod pickups;
pub mod player;
pub mod portal;
pub mod splitter;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::Contact;
pub use geometry::{Axis, Rect};
pub use obstacles::{Behavior, Obstacle, ObstacleField};
pub use pickups::{Pickup, PickupKind, PowerUpField};
pub use player::{MovementIntent, Player};
pub use portal::{Orientation, PortalPhase, PortalStateMachine};
pub use state::{GameEvent, GamePhase, GameState, SessionStats};
pub use tick::{TickInput, TickOutcome, tick};
