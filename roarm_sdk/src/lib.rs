use serde::{Deserialize, Serialize};

pub mod errors;
pub use errors::*;

pub mod framing;
pub mod geometry;
pub mod kinematics;
pub mod limits;
pub mod packets;
pub mod units;

#[cfg(feature = "driver")]
pub mod drivers;
#[cfg(feature = "driver")]
pub mod transport;

/// JSON protocol types used to communicate with the arm firmware.
/// These retain serde renaming to match the device's wire format.
pub mod protocol {
    pub use super::packets::*;
}

/// Supported arm variants.
///
/// * `M2` - 4 joints (base, shoulder, elbow, gripper hand).
/// * `M3` - 6 joints (base, shoulder, elbow, wrist, roll, gripper hand).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmType {
    #[serde(rename = "roarm_m2")]
    M2,
    #[serde(rename = "roarm_m3")]
    M3,
}

impl ArmType {
    pub fn dof(self) -> usize {
        match self {
            ArmType::M2 => 4,
            ArmType::M3 => 6,
        }
    }

    /// Joint number (1-based) of the reverse-mounted gripper hand.
    pub fn gripper_joint(self) -> u8 {
        match self {
            ArmType::M2 => 4,
            ArmType::M3 => 6,
        }
    }
}

/// End-effector convention for the 4-DOF arm.
///
/// In `Direct` mode the hand joint angle is reported as the pose tilt
/// unchanged. In `Compensated` mode the hand drives a third planar link
/// and the tilt is expressed relative to horizontal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndEffectorMode {
    Direct,
    Compensated,
}

/// One joint configuration, radians, ordered base first and gripper last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointsRad {
    M2 {
        base: f64,
        shoulder: f64,
        elbow: f64,
        hand: f64,
    },
    M3 {
        base: f64,
        shoulder: f64,
        elbow: f64,
        wrist: f64,
        roll: f64,
        hand: f64,
    },
}

impl JointsRad {
    pub fn zeroed(arm: ArmType) -> Self {
        match arm {
            ArmType::M2 => JointsRad::M2 {
                base: 0.0,
                shoulder: 0.0,
                elbow: 0.0,
                hand: 0.0,
            },
            ArmType::M3 => JointsRad::M3 {
                base: 0.0,
                shoulder: 0.0,
                elbow: 0.0,
                wrist: 0.0,
                roll: 0.0,
                hand: 0.0,
            },
        }
    }

    pub fn arm(&self) -> ArmType {
        match self {
            JointsRad::M2 { .. } => ArmType::M2,
            JointsRad::M3 { .. } => ArmType::M3,
        }
    }

    pub fn from_slice(arm: ArmType, radians: &[f64]) -> Result<Self, RoarmError> {
        if radians.len() != arm.dof() {
            return Err(RoarmError::Validation(format!(
                "The length of radians must be {}.",
                arm.dof()
            )));
        }
        Ok(match arm {
            ArmType::M2 => JointsRad::M2 {
                base: radians[0],
                shoulder: radians[1],
                elbow: radians[2],
                hand: radians[3],
            },
            ArmType::M3 => JointsRad::M3 {
                base: radians[0],
                shoulder: radians[1],
                elbow: radians[2],
                wrist: radians[3],
                roll: radians[4],
                hand: radians[5],
            },
        })
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match *self {
            JointsRad::M2 {
                base,
                shoulder,
                elbow,
                hand,
            } => vec![base, shoulder, elbow, hand],
            JointsRad::M3 {
                base,
                shoulder,
                elbow,
                wrist,
                roll,
                hand,
            } => vec![base, shoulder, elbow, wrist, roll, hand],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_vec().iter().all(|v| v.is_finite())
    }
}

/// Cartesian end-effector pose, millimeters and radians.
///
/// The variant records which arm produced the pose; the 4-DOF arm also
/// carries the end-effector mode its tilt was computed under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pose {
    M2 {
        x: f64,
        y: f64,
        z: f64,
        mode: EndEffectorMode,
        tilt: f64,
    },
    M3 {
        x: f64,
        y: f64,
        z: f64,
        roll: f64,
        tilt: f64,
    },
}

impl Pose {
    pub fn arm(&self) -> ArmType {
        match self {
            Pose::M2 { .. } => ArmType::M2,
            Pose::M3 { .. } => ArmType::M3,
        }
    }

    pub fn position(&self) -> (f64, f64, f64) {
        match *self {
            Pose::M2 { x, y, z, .. } | Pose::M3 { x, y, z, .. } => (x, y, z),
        }
    }
}
