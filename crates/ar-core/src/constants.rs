use std::time::Duration;

// Placement and tracking tuning constants shared by the engine and its drivers.

// Placement filter
pub const MAX_OBJECT_DISTANCE: f32 = 10.0; // meters, camera -> object
pub const DISTANCE_HISTORY_LEN: usize = 10; // rolling window for distance smoothing

// High-confidence feature hit test
pub const FEATURE_CONE_ANGLE_DEG: f32 = 18.0; // full opening angle of the search cone
pub const FEATURE_MIN_DISTANCE: f32 = 0.2; // meters along the ray
pub const FEATURE_MAX_DISTANCE: f32 = 2.0;

// Plane snapping
pub const PLANE_EXTENT_TOLERANCE: f32 = 0.1; // fraction of extent added on each side
pub const SNAP_VERTICAL_ALLOWANCE: f32 = 0.03; // meters above/below the plane
pub const SNAP_ANIMATION_DURATION: Duration = Duration::from_millis(500);
pub const ON_PLANE_EPSILON: f32 = 1e-5; // offsets below this count as resting on the plane

// Tracking fallback
pub const TRACKING_FALLBACK_DELAY: Duration = Duration::from_secs(10);

// Session restart
pub const RESTART_COOLDOWN: Duration = Duration::from_secs(5);

// Lighting
pub const DEFAULT_ENVIRONMENT_INTENSITY: f32 = 25.0; // used when no light estimate is available
pub const AMBIENT_INTENSITY_DIVISOR: f32 = 40.0; // lumens -> environment map intensity

// Infinite horizontal plane hit test
pub const INFINITE_PLANE_MIN_DOWNWARD: f32 = 0.03; // min downward component of the unit ray
