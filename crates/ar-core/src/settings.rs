use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

/// Persisted user settings.
///
/// Read when a session starts and again whenever the settings panel is
/// dismissed. Missing keys fall back to [`Settings::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ask the frame source for ambient light estimates.
    #[serde(rename = "ambientLightEstimationEnabled")]
    pub ambient_light_estimation: bool,
    /// Let drags consider an infinite horizontal plane before feature points.
    #[serde(rename = "dragOnInfinitePlanesEnabled")]
    pub drag_on_infinite_planes: bool,
    /// Fall back to orientation-only tracking after sustained limited tracking.
    #[serde(rename = "use3DOFTrackingFallback")]
    pub use_3dof_tracking_fallback: bool,
    /// Show the plane debug overlay.
    #[serde(rename = "debugVisualsEnabled")]
    pub debug_visuals: bool,
    /// Run orientation-only tracking from the start.
    #[serde(rename = "use3DOFTracking")]
    pub use_3dof_tracking: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ambient_light_estimation: true,
            drag_on_infinite_planes: true,
            use_3dof_tracking_fallback: false,
            debug_visuals: false,
            use_3dof_tracking: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
