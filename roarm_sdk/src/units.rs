//! Unit and mounting-convention conversions.
//!
//! All functions are pure. The gripper hand joint is mounted reversed on
//! both arm variants, so its angle is mirrored (`limit - value`) on the
//! way out and again on the way in; two applications cancel.

use std::f64::consts::PI;

/// Raw servo resolution of a half turn.
const TICKS_PER_HALF_TURN: f64 = 2048.0;
/// Raw acceleration scale divisor.
const ACC_TICK_DIVISOR: f64 = 254.0 * 100.0;

pub fn angle_to_radian(deg: f64) -> f64 {
    deg * PI / 180.0
}

pub fn radian_to_angle(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Servo speed ticks (0..=4096) to degrees per unit time.
pub fn speed_ticks_to_angle(ticks: f64) -> f64 {
    ticks * 180.0 / TICKS_PER_HALF_TURN
}

/// Servo acceleration ticks (0..=254) to the firmware's angle scale.
pub fn acc_ticks_to_angle(ticks: f64) -> f64 {
    ticks * 180.0 / ACC_TICK_DIVISOR
}

pub fn mirror_rad(rad: f64) -> f64 {
    PI - rad
}

pub fn mirror_angle(deg: f64) -> f64 {
    180.0 - deg
}
