use crate::error::UnknownCategory;
use glam::{Quat, Vec3};
use std::str::FromStr;

/// Model categories the sketch classifier can return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    Chair,
    Vase,
    Lamp,
    Candle,
    Cup,
}

impl ObjectCategory {
    pub const ALL: [ObjectCategory; 5] = [
        ObjectCategory::Chair,
        ObjectCategory::Vase,
        ObjectCategory::Lamp,
        ObjectCategory::Candle,
        ObjectCategory::Cup,
    ];

    /// Position in the model catalogue.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label used by the classifier service.
    pub fn label(self) -> &'static str {
        match self {
            ObjectCategory::Chair => "chair",
            ObjectCategory::Vase => "vase",
            ObjectCategory::Lamp => "lamp",
            ObjectCategory::Candle => "candle",
            ObjectCategory::Cup => "cup",
        }
    }
}

impl FromStr for ObjectCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// The single placed item.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualObject {
    pub category: ObjectCategory,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    /// Whether the object is currently a child of the scene root.
    pub attached: bool,
}

impl VirtualObject {
    pub fn new(category: ObjectCategory) -> Self {
        Self {
            category,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: 1.0,
            attached: false,
        }
    }

    /// Heading around the world Y axis in whole degrees (truncated), normalized to [0, 360).
    pub fn yaw_degrees(&self) -> i32 {
        let (yaw, _, _) = self.orientation.to_euler(glam::EulerRot::YXZ);
        // Quaternion round trips drift by far less than a millidegree.
        let degrees = (yaw.to_degrees() * 1000.0).round() / 1000.0;
        (degrees as i32).rem_euclid(360)
    }
}
