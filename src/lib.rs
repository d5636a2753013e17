//! Beer Pong - augmented-reality cup game logic
//!
//! Core modules:
//! - `sim`: Session state machine, table placement, throws and cup scoring
//! - `platform`: Traits the AR host implements, plus an in-memory headless host
//! - `audio`: Sound cue selection and volume
//! - `settings`: Data-driven tunables (JSON)
//! - `error`: Session error type

pub mod audio;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::SessionError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::{Vec3, Vec4};

    /// Template asset holding the table, cups and floor
    pub const TABLE_TEMPLATE: &str = "table";

    /// Node names inside the table template
    pub const TABLE_NAME: &str = "table";
    pub const TABLE_TOP_NAME: &str = "top";
    /// Substring match: any child of the table containing this is a leg
    pub const LEG_NAME: &str = "leg";
    pub const CUPS_NAME: &str = "cups";
    pub const CUP_BOTTOM_NAME: &str = "bottom";
    pub const CUP_SIDE_NAME: &str = "side";
    pub const FLOOR_NAME: &str = "floor";

    /// Name tag of scanning overlays (bulk-removed after placement)
    pub const PLANE_OVERLAY_NAME: &str = "plane detector";
    /// Translucent red
    pub const PLANE_OVERLAY_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 0.5];

    /// Table geometry (meters)
    pub const LEG_THICKNESS: f32 = 0.06;
    pub const LEG_HEIGHT: f32 = 0.67;
    pub const TABLE_TOP_HEIGHT: f32 = 0.06;
    pub const TABLE_TOP_WIDTH: f32 = 1.0;
    pub const TABLE_TOP_LENGTH: f32 = 1.5;

    /// Material restitution per part
    pub const TABLE_RESTITUTION: f32 = 1.3;
    pub const CUP_BOTTOM_RESTITUTION: f32 = 0.0;
    pub const CUP_SIDE_RESTITUTION: f32 = 0.1;
    pub const FLOOR_RESTITUTION: f32 = 1.1;
    pub const FLOOR_ROLLING_FRICTION: f32 = 0.05;

    /// Collision categories
    pub const DEFAULT_CATEGORY: u32 = 1;
    pub const BALL_CATEGORY: u32 = 1 << 1;

    /// Ball defaults - a regulation 40 mm ping pong ball
    pub const BALL_RADIUS: f32 = 0.02;
    pub const BALL_COLOR: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
    pub const BALL_RESTITUTION: f32 = 1.0;
    pub const BALL_ROLLING_FRICTION: f32 = 0.05;
    /// Spawn slightly below and in front of the camera
    pub const BALL_SPAWN_OFFSET: Vec3 = Vec3::new(0.0, -0.05, -0.2);
    /// Forward and to the left in camera space
    pub const BALL_LAUNCH_IMPULSE: Vec4 = Vec4::new(-2.2, 0.0, -1.0, 0.0);

    /// Thrown balls live this long before being despawned
    pub const PROJECTILE_LIFETIME_SECS: f32 = 10.0;
    pub const MAX_PROJECTILES: usize = 16;

    /// Sunk animation
    pub const SHORT_FADE_SECS: f32 = 0.5;
    pub const LONG_FADE_SECS: f32 = 0.75;

    /// Alert body shown under every error title
    pub const ALERT_MESSAGE: &str = "Please try restarting the app";
}
