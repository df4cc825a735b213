//! Per-frame physics telemetry ingested by the engine.
//!
//! Rendered as a sum type rather than separate polymorphic collision
//! classes, matching the rest of this crate's data-model choices (see
//! `material::AudioMaterial`, `synth::ScrapeStep`).

use crate::vec3::Vec3;

/// Enter/stay/exit state of a collision manifold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactState {
    Enter,
    Stay,
    Exit,
}

/// One frame's worth of physics telemetry: a flat sequence of typed records.
pub type Frame = [TelemetryRecord];

/// A single telemetry record for one simulation frame.
#[derive(Debug, Clone)]
pub enum TelemetryRecord {
    Rigidbody {
        id: u32,
        velocity: Vec3,
        angular_velocity: Vec3,
        sleeping: bool,
        mass: f64,
    },
    RobotJointVelocity {
        id: u32,
        velocity: Vec3,
        angular_velocity: Vec3,
        sleeping: bool,
        mass: f64,
    },
    StaticRigidbody {
        id: u32,
        mass: f64,
        bounciness: f64,
    },
    StaticRobot {
        id: u32,
        name: String,
        mass: f64,
    },
    Segmentation {
        id: u32,
        name: String,
        category: String,
    },
    Collision {
        collider_id: u32,
        collidee_id: u32,
        state: ContactState,
        points: Vec<Vec3>,
        normals: Vec<Vec3>,
        relative_velocity: Vec3,
    },
    EnvironmentCollision {
        object_id: u32,
        state: ContactState,
        points: Vec<Vec3>,
        normals: Vec<Vec3>,
        floor: bool,
    },
}

impl TelemetryRecord {
    pub fn id(&self) -> Option<u32> {
        match self {
            TelemetryRecord::Rigidbody { id, .. }
            | TelemetryRecord::RobotJointVelocity { id, .. }
            | TelemetryRecord::StaticRigidbody { id, .. }
            | TelemetryRecord::StaticRobot { id, .. }
            | TelemetryRecord::Segmentation { id, .. } => Some(*id),
            TelemetryRecord::Collision { .. } | TelemetryRecord::EnvironmentCollision { .. } => None,
        }
    }
}
