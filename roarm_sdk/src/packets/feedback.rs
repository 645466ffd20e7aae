use serde::{Deserialize, Serialize};

use crate::{units, ArmType};

/// Type code of an inbound telemetry frame.
pub const TELEMETRY_CODE: u16 = 1051;

/// Telemetry reported by the 4-DOF arm: Cartesian tool position, the four
/// joint angles (radians, raw servo frame) and per-joint torque loads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedbackM2 {
    #[serde(rename = "T")]
    pub code: u16,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub b: f64,
    pub s: f64,
    pub e: f64,
    pub t: f64,
    #[serde(rename = "torB", default)]
    pub tor_b: f64,
    #[serde(rename = "torS", default)]
    pub tor_s: f64,
    #[serde(rename = "torE", default)]
    pub tor_e: f64,
    #[serde(rename = "torH", default)]
    pub tor_h: f64,
}

/// Telemetry reported by the 6-DOF arm. `tit` is the tool tilt relative
/// to horizontal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedbackM3 {
    #[serde(rename = "T")]
    pub code: u16,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub tit: f64,
    pub b: f64,
    pub s: f64,
    pub e: f64,
    pub t: f64,
    pub r: f64,
    pub g: f64,
    #[serde(rename = "tB", default)]
    pub tor_b: f64,
    #[serde(rename = "tS", default)]
    pub tor_s: f64,
    #[serde(rename = "tE", default)]
    pub tor_e: f64,
    #[serde(rename = "tT", default)]
    pub tor_t: f64,
    #[serde(rename = "tR", default)]
    pub tor_r: f64,
    #[serde(rename = "tG", default)]
    pub tor_g: f64,
}

/// One parsed telemetry frame. The variants share no tag beyond their
/// field sets, so deserialization is untagged with the richer 6-DOF
/// shape tried first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Feedback {
    M3(FeedbackM3),
    M2(FeedbackM2),
}

impl Feedback {
    pub fn arm(&self) -> ArmType {
        match self {
            Feedback::M2(_) => ArmType::M2,
            Feedback::M3(_) => ArmType::M3,
        }
    }

    /// Flat projection in the documented order, with the gripper hand
    /// un-mirrored back into the caller's frame:
    /// m2 `[x, y, z, b, s, e, pi - t]`,
    /// m3 `[x, y, z, tit, b, s, e, t, r, pi - g]`.
    pub fn flat(&self) -> Vec<f64> {
        match self {
            Feedback::M2(fb) => vec![
                fb.x,
                fb.y,
                fb.z,
                fb.b,
                fb.s,
                fb.e,
                units::mirror_rad(fb.t),
            ],
            Feedback::M3(fb) => vec![
                fb.x,
                fb.y,
                fb.z,
                fb.tit,
                fb.b,
                fb.s,
                fb.e,
                fb.t,
                fb.r,
                units::mirror_rad(fb.g),
            ],
        }
    }

    /// Current joint vector, radians, base first and gripper last.
    pub fn joints_rad(&self) -> Vec<f64> {
        let flat = self.flat();
        match self {
            Feedback::M2(_) => flat[3..7].to_vec(),
            Feedback::M3(_) => flat[4..10].to_vec(),
        }
    }

    /// Current pose vector with orientation components in degrees:
    /// m2 `[x, y, z, t_deg]`, m3 `[x, y, z, tit_deg, r_deg, g_deg]`.
    pub fn pose_vec(&self) -> Vec<f64> {
        let flat = self.flat();
        let mut pose = match self {
            Feedback::M2(_) => vec![flat[0], flat[1], flat[2], flat[6]],
            Feedback::M3(_) => vec![flat[0], flat[1], flat[2], flat[3], flat[8], flat[9]],
        };
        for value in pose.iter_mut().skip(3) {
            *value = units::radian_to_angle(*value);
        }
        pose
    }

    /// Current gripper hand angle, radians, un-mirrored.
    pub fn gripper_rad(&self) -> f64 {
        match self {
            Feedback::M2(fb) => units::mirror_rad(fb.t),
            Feedback::M3(fb) => units::mirror_rad(fb.g),
        }
    }
}
