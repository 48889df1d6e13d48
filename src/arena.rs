//! Arena-side data: what the simulator reports and the local sandbox simulator

pub mod events;
pub mod sandbox;
pub mod telemetry;

pub use events::CombatEvent;
pub use sandbox::{OpponentStyle, SandboxArena, SandboxConfig};
pub use telemetry::{ArenaSize, OpponentScan, Telemetry};
