//! Per-variant joint limit tables and encode-time argument validation.
//!
//! Range violations on joints, angles, positions and torques abort the
//! call with [`RoarmError::Validation`] before anything is sent. Speed
//! and acceleration are deliberately warn-only, matching the firmware's
//! tolerance for out-of-range values there.

use crate::{ArmType, RoarmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Radians,
    Angles,
    Positions,
    Torques,
}

impl ValueKind {
    fn name(self) -> &'static str {
        match self {
            ValueKind::Radians => "radians",
            ValueKind::Angles => "angles",
            ValueKind::Positions => "positions",
            ValueKind::Torques => "torques",
        }
    }
}

pub struct RobotLimit {
    pub radians_min: &'static [f64],
    pub radians_max: &'static [f64],
    pub angles_min: &'static [f64],
    pub angles_max: &'static [f64],
    pub positions_min: &'static [f64],
    pub positions_max: &'static [f64],
    pub torques_min: &'static [f64],
    pub torques_max: &'static [f64],
}

static ROARM_M2_LIMIT: RobotLimit = RobotLimit {
    radians_min: &[-3.3, -1.9, -1.2, -0.2],
    radians_max: &[3.3, 1.9, 3.3, 1.9],
    angles_min: &[-190.0, -110.0, -70.0, -10.0],
    angles_max: &[190.0, 110.0, 190.0, 100.0],
    positions_min: &[-500.0, -500.0, 0.0, 0.0],
    positions_max: &[500.0, 500.0, 600.0, 90.0],
    torques_min: &[1.0, 1.0, 1.0, 1.0],
    torques_max: &[1000.0, 1000.0, 1000.0, 1000.0],
};

static ROARM_M3_LIMIT: RobotLimit = RobotLimit {
    radians_min: &[-3.3, -1.9, -1.2, -1.9, -3.3, -0.2],
    radians_max: &[3.3, 1.9, 3.3, 1.9, 3.3, 1.9],
    angles_min: &[-190.0, -110.0, -70.0, -110.0, -190.0, -10.0],
    angles_max: &[190.0, 110.0, 190.0, 110.0, 190.0, 100.0],
    positions_min: &[-500.0, -500.0, 0.0, -90.0, -180.0, 0.0],
    positions_max: &[500.0, 500.0, 600.0, 90.0, 180.0, 90.0],
    torques_min: &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    torques_max: &[1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0],
};

pub const SPEED_RANGE: (f64, f64) = (0.0, 4096.0);
pub const ACC_RANGE: (f64, f64) = (0.0, 254.0);

pub fn limit(arm: ArmType) -> &'static RobotLimit {
    match arm {
        ArmType::M2 => &ROARM_M2_LIMIT,
        ArmType::M3 => &ROARM_M3_LIMIT,
    }
}

impl RobotLimit {
    fn range(&self, kind: ValueKind) -> (&'static [f64], &'static [f64]) {
        match kind {
            ValueKind::Radians => (self.radians_min, self.radians_max),
            ValueKind::Angles => (self.angles_min, self.angles_max),
            ValueKind::Positions => (self.positions_min, self.positions_max),
            ValueKind::Torques => (self.torques_min, self.torques_max),
        }
    }
}

/// `cmd` and `mode` style flags accept 0 or 1 only.
pub fn check_cmd(param: &str, value: u8) -> Result<(), RoarmError> {
    if value > 1 {
        return Err(RoarmError::Validation(format!(
            "The data supported by parameter {} is 0 or 1, but received {}",
            param, value
        )));
    }
    Ok(())
}

pub fn check_wifi_cmd(value: u8) -> Result<(), RoarmError> {
    if value > 3 {
        return Err(RoarmError::Validation(format!(
            "The data supported by parameter wifi_cmd is 0 or 1 or 2 or 3, but received {}",
            value
        )));
    }
    Ok(())
}

/// Joint ids are 1-based and bounded by the variant's DOF count.
pub fn check_joint(arm: ArmType, joint: u8) -> Result<(), RoarmError> {
    if joint == 0 || joint as usize > arm.dof() {
        return Err(RoarmError::Validation(format!(
            "The id not right, should be in 1 ~ {}, but received {}",
            arm.dof(),
            joint
        )));
    }
    Ok(())
}

/// Range-check one value for one joint (1-based id).
pub fn check_joint_value(
    arm: ArmType,
    joint: u8,
    kind: ValueKind,
    value: f64,
) -> Result<(), RoarmError> {
    check_joint(arm, joint)?;
    let (min, max) = limit(arm).range(kind);
    let idx = joint as usize - 1;
    if value < min[idx] || value > max[idx] {
        return Err(RoarmError::Validation(format!(
            "{} value not right, should be {} ~ {}, but received {}",
            kind.name(),
            min[idx],
            max[idx],
            value
        )));
    }
    Ok(())
}

/// Range-check a whole per-joint vector; the length must match the DOF
/// count exactly.
pub fn check_vector(arm: ArmType, kind: ValueKind, values: &[f64]) -> Result<(), RoarmError> {
    let (min, max) = limit(arm).range(kind);
    if values.len() != min.len() {
        return Err(RoarmError::Validation(format!(
            "The length of {} must be {}.",
            kind.name(),
            min.len()
        )));
    }
    for (i, value) in values.iter().enumerate() {
        if *value < min[i] || *value > max[i] {
            return Err(RoarmError::Validation(format!(
                "Has invalid {} value, error on index {}. Received {} but {} should be {} ~ {}.",
                kind.name(),
                i,
                value,
                kind.name(),
                min[i],
                max[i]
            )));
        }
    }
    Ok(())
}

pub fn check_speed(value: f64) {
    let (min, max) = SPEED_RANGE;
    if value < min || value > max {
        tracing::warn!(
            "speed value not right, should be between {} ~ {}, but received {}.",
            min,
            max,
            value
        );
    }
}

pub fn check_acc(value: f64) {
    let (min, max) = ACC_RANGE;
    if value < min || value > max {
        tracing::warn!(
            "acc value not right, should be between {} ~ {}, but received {}.",
            min,
            max,
            value
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_id_bounds() {
        assert!(check_joint(ArmType::M2, 1).is_ok());
        assert!(check_joint(ArmType::M2, 4).is_ok());
        assert!(check_joint(ArmType::M2, 5).is_err());
        assert!(check_joint(ArmType::M3, 6).is_ok());
        assert!(check_joint(ArmType::M3, 0).is_err());
    }

    #[test]
    fn per_joint_ranges() {
        assert!(check_joint_value(ArmType::M2, 2, ValueKind::Radians, 1.5).is_ok());
        assert!(check_joint_value(ArmType::M2, 2, ValueKind::Radians, 2.5).is_err());
        assert!(check_joint_value(ArmType::M3, 6, ValueKind::Angles, 100.0).is_ok());
        assert!(check_joint_value(ArmType::M3, 6, ValueKind::Angles, 101.0).is_err());
    }

    #[test]
    fn vector_length_and_ranges() {
        assert!(check_vector(ArmType::M2, ValueKind::Radians, &[0.0, 0.0, 1.5708, 0.0]).is_ok());
        assert!(check_vector(ArmType::M2, ValueKind::Radians, &[0.0, 0.0, 1.5708]).is_err());
        let err = check_vector(ArmType::M3, ValueKind::Positions, &[0.0, 0.0, 700.0, 0.0, 0.0, 0.0])
            .unwrap_err();
        match err {
            RoarmError::Validation(msg) => assert!(msg.contains("index 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
