//! Closed-form kinematics for both arm variants.
//!
//! The arm is modeled as a planar two-link chain (shoulder, elbow) in the
//! vertical plane, rotated about the base yaw axis. The 6-DOF variant
//! appends the wrist/end link as a third planar segment; roll passes
//! through untouched. Link lengths carry a lateral offset component, so
//! every segment contributes through its effective length and derived
//! offset angle (see [`crate::geometry`]).
//!
//! Inverse kinematics never returns NaN: a target outside the reachable
//! workspace falls back to the last valid solution held in the
//! caller-owned [`IkCache`], with a single warning logged.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::geometry::ArmGeometry;
use crate::{EndEffectorMode, JointsRad, Pose};

/// Raw planar two-link solution. `tool` is the angle left for the end
/// link to stay vertical (`pi/2 - shoulder - elbow`). Components may be
/// NaN when the target lies outside the triangle inequality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarIk {
    pub shoulder: f64,
    pub elbow: f64,
    pub tool: f64,
}

pub fn cartesian_to_polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

pub fn polar_to_cartesian(r: f64, theta: f64) -> (f64, f64) {
    (r * theta.cos(), r * theta.sin())
}

/// Law-of-cosines solution of the two-link sub-problem in the arm's
/// vertical plane: `a` is the horizontal reach, `b` the height.
///
/// The near-zero height branch avoids the hypotenuse/atan2 path, which
/// turns unstable as `b` vanishes.
pub fn simple_linkage_ik_rad(geom: &ArmGeometry, a: f64, b: f64) -> PlanarIk {
    let la = geom.l2.length;
    let lb = geom.l3.length;
    let t2rad = geom.l2.offset;
    let t3rad = geom.l3.offset;

    let (alpha, beta) = if b.abs() < 1e-6 {
        let psi = ((la * la + a * a - lb * lb) / (2.0 * la * a)).acos() + t2rad;
        let alpha = FRAC_PI_2 - psi;
        let omega = ((a * a + lb * lb - la * la) / (2.0 * a * lb)).acos();
        (alpha, psi + omega - t3rad)
    } else {
        let l2c = a * a + b * b;
        let lc = l2c.sqrt();
        let lambda = b.atan2(a);
        let psi = ((la * la + l2c - lb * lb) / (2.0 * la * lc)).acos() + t2rad;
        let alpha = FRAC_PI_2 - lambda - psi;
        let omega = ((lb * lb + l2c - la * la) / (2.0 * lc * lb)).acos();
        (alpha, psi + omega - t3rad)
    };

    PlanarIk {
        shoulder: alpha,
        elbow: beta,
        tool: FRAC_PI_2 - alpha - beta,
    }
}

/// Horizontal/vertical offset of the wrist point behind the tool tip for
/// a given tool pitch (6-DOF wrist compensation).
fn rotate_point(geom: &ArmGeometry, theta: f64) -> (f64, f64) {
    let alpha = geom.end.offset + theta;
    (-geom.end.length * alpha.cos(), -geom.end.length * alpha.sin())
}

/// Pull a point `s` millimeters toward the origin, clamped at the origin
/// so the compensation can never overshoot past the base axis.
fn move_point(x: f64, y: f64, s: f64) -> (f64, f64) {
    let distance = x.hypot(y);
    if distance - s <= 1e-6 {
        (0.0, 0.0)
    } else {
        let ratio = (distance - s) / distance;
        (x * ratio, y * ratio)
    }
}

/// Forward kinematics. Always defined for finite inputs.
///
/// `mode` selects the 4-DOF end-effector convention and is ignored for
/// the 6-DOF arm.
pub fn forward(geom: &ArmGeometry, joints: &JointsRad, mode: EndEffectorMode) -> Pose {
    debug_assert_eq!(geom.arm, joints.arm());
    match *joints {
        JointsRad::M2 {
            base,
            shoulder,
            elbow,
            hand,
        } => {
            let (a_out, b_out) =
                polar_to_cartesian(geom.l2.length, FRAC_PI_2 - (shoulder + geom.l2.offset));
            let (c_out, d_out) = polar_to_cartesian(
                geom.l3.length,
                FRAC_PI_2 - (elbow + shoulder + geom.l3.offset),
            );
            match mode {
                EndEffectorMode::Direct => {
                    let (x, y) = polar_to_cartesian(a_out + c_out, base);
                    Pose::M2 {
                        x,
                        y,
                        z: b_out + d_out,
                        mode,
                        tilt: hand,
                    }
                }
                EndEffectorMode::Compensated => {
                    let (e_out, f_out) = polar_to_cartesian(
                        geom.end.length,
                        -(hand + geom.end.offset - PI - (FRAC_PI_2 - shoulder - elbow)),
                    );
                    let (x, y) = polar_to_cartesian(a_out + c_out + e_out, base);
                    Pose::M2 {
                        x,
                        y,
                        z: b_out + d_out + f_out,
                        mode,
                        tilt: hand - (PI - shoulder - elbow) + FRAC_PI_2,
                    }
                }
            }
        }
        JointsRad::M3 {
            base,
            shoulder,
            elbow,
            wrist,
            roll,
            ..
        } => {
            let (a_out, b_out) =
                polar_to_cartesian(geom.l2.length, FRAC_PI_2 - (shoulder + geom.l2.offset));
            let (c_out, d_out) = polar_to_cartesian(
                geom.l3.length,
                FRAC_PI_2 - (elbow + shoulder + geom.l3.offset),
            );
            let (e_out, f_out) = polar_to_cartesian(
                geom.end.length,
                FRAC_PI_2 - (elbow + shoulder + wrist + geom.end.offset),
            );
            let (x, y) = polar_to_cartesian(a_out + c_out + e_out, base);
            Pose::M3 {
                x,
                y,
                z: b_out + d_out + f_out,
                roll,
                tilt: elbow + shoulder + wrist - FRAC_PI_2,
            }
        }
    }
}

/// Last valid inverse solution, owned by the caller and threaded through
/// [`inverse`]. Starts at the all-zero configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkCache {
    last: JointsRad,
}

impl IkCache {
    pub fn new(arm: crate::ArmType) -> Self {
        Self {
            last: JointsRad::zeroed(arm),
        }
    }

    pub fn last(&self) -> &JointsRad {
        &self.last
    }
}

/// Inverse kinematics.
///
/// `hand_rad` is the gripper joint, passed through untouched (for the
/// 4-DOF arm it doubles as the reported tilt in direct mode). A target
/// with no closed-form solution yields the cache's previous result and
/// one warning; actuator commands therefore never see NaN.
pub fn inverse(geom: &ArmGeometry, pose: &Pose, hand_rad: f64, cache: &mut IkCache) -> JointsRad {
    debug_assert_eq!(geom.arm, pose.arm());
    let candidate = match *pose {
        Pose::M2 { x, y, z, .. } => {
            let (base_r, base_theta) = cartesian_to_polar(x, y);
            let planar = simple_linkage_ik_rad(geom, base_r, z);
            JointsRad::M2 {
                base: base_theta,
                shoulder: planar.shoulder,
                elbow: planar.elbow,
                hand: hand_rad,
            }
        }
        Pose::M3 {
            x,
            y,
            z,
            roll,
            tilt,
        } => {
            // Project the target back along the pitched end link, then
            // solve the remaining shoulder/elbow pair. The firmware uses
            // the literal 3.1416 here rather than pi; kept as-is.
            let (dr, dz) = rotate_point(geom, tilt - 3.1416);
            let (bx, by) = move_point(x, y, dr);
            let (base_r, base_theta) = cartesian_to_polar(bx, by);
            let planar = simple_linkage_ik_rad(geom, base_r, z + dz);
            JointsRad::M3 {
                base: base_theta,
                shoulder: planar.shoulder,
                elbow: planar.elbow,
                wrist: planar.tool + tilt,
                roll,
                hand: hand_rad,
            }
        }
    };

    if candidate.is_finite() {
        cache.last = candidate;
        candidate
    } else {
        tracing::warn!("Inverse kinematics returned NaN. Using last valid result.");
        cache.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArmType;

    const M3_RT_TOL: f64 = 1e-4;

    fn geom(arm: ArmType) -> ArmGeometry {
        ArmGeometry::new(arm)
    }

    #[test]
    fn m2_forward_home() {
        let g = geom(ArmType::M2);
        let joints = JointsRad::M2 {
            base: 0.0,
            shoulder: 0.0,
            elbow: FRAC_PI_2,
            hand: 0.0,
        };
        let pose = forward(&g, &joints, EndEffectorMode::Direct);
        let (hx, hy, hz) = g.home_position();
        let (x, y, z) = pose.position();
        assert!((x - hx).abs() < 1e-9);
        assert!((y - hy).abs() < 1e-9);
        assert!((z - hz).abs() < 1e-9);
    }

    #[test]
    fn m3_forward_home() {
        let g = geom(ArmType::M3);
        let joints = JointsRad::M3 {
            base: 0.0,
            shoulder: 0.0,
            elbow: FRAC_PI_2,
            wrist: 0.0,
            roll: 0.0,
            hand: 0.0,
        };
        let pose = forward(&g, &joints, EndEffectorMode::Direct);
        let (x, y, z) = pose.position();
        // z sits at l2A - l4B with the elbow raised, x at l2B + l3A + l4A
        assert!((x - 346.16).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        assert!((z - 223.13).abs() < 1e-9);
        match pose {
            Pose::M3 { tilt, .. } => assert!(tilt.abs() < 1e-12),
            _ => unreachable!(),
        }
    }

    #[test]
    fn m2_roundtrip() {
        let g = geom(ArmType::M2);
        let mut cache = IkCache::new(ArmType::M2);
        for joints in [
            [0.3, 0.2, 1.2, 1.0],
            [0.0, 0.0, FRAC_PI_2, 0.0],
            [-1.0, 0.6, 0.4, 1.8],
            [0.5, -0.3, 1.8, 0.1],
        ] {
            let j = JointsRad::M2 {
                base: joints[0],
                shoulder: joints[1],
                elbow: joints[2],
                hand: joints[3],
            };
            let pose = forward(&g, &j, EndEffectorMode::Direct);
            let solved = inverse(&g, &pose, joints[3], &mut cache);
            for (got, want) in solved.to_vec().iter().zip(j.to_vec().iter()) {
                assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
            }
        }
    }

    #[test]
    fn m3_roundtrip() {
        let g = geom(ArmType::M3);
        let mut cache = IkCache::new(ArmType::M3);
        for joints in [
            [0.3, 0.2, 1.2, -0.4, 0.5, 1.0],
            [0.0, 0.0, FRAC_PI_2, 0.0, 0.0, 0.0],
            [-0.8, 0.4, 0.9, 0.3, -1.0, 1.5],
            [1.2, -0.5, 1.8, 0.8, 0.0, 0.5],
        ] {
            let j = JointsRad::from_slice(ArmType::M3, &joints).unwrap();
            let pose = forward(&g, &j, EndEffectorMode::Direct);
            let solved = inverse(&g, &pose, joints[5], &mut cache);
            for (got, want) in solved.to_vec().iter().zip(j.to_vec().iter()) {
                assert!(
                    (got - want).abs() < M3_RT_TOL,
                    "got {got}, want {want}"
                );
            }
        }
    }

    #[test]
    fn unreachable_target_returns_last_valid() {
        let g = geom(ArmType::M2);
        let mut cache = IkCache::new(ArmType::M2);

        let reachable = Pose::M2 {
            x: 300.0,
            y: 0.0,
            z: 150.0,
            mode: EndEffectorMode::Direct,
            tilt: 0.4,
        };
        let good = inverse(&g, &reachable, 0.4, &mut cache);
        assert!(good.is_finite());

        // Reach beyond l2 + l3: the planar acos falls outside its domain.
        let unreachable = Pose::M2 {
            x: 900.0,
            y: 0.0,
            z: 0.0,
            mode: EndEffectorMode::Direct,
            tilt: 0.0,
        };
        let fallback = inverse(&g, &unreachable, 0.0, &mut cache);
        assert_eq!(fallback, good);
        assert!(fallback.is_finite());
        assert_eq!(cache.last(), &good);
    }

    #[test]
    fn unreachable_m3_never_nan() {
        let g = geom(ArmType::M3);
        let mut cache = IkCache::new(ArmType::M3);
        let unreachable = Pose::M3 {
            x: 2000.0,
            y: 0.0,
            z: 0.0,
            roll: 0.0,
            tilt: 0.0,
        };
        let fallback = inverse(&g, &unreachable, 0.0, &mut cache);
        assert_eq!(fallback, JointsRad::zeroed(ArmType::M3));
    }

    #[test]
    fn degenerate_height_branch() {
        let g = geom(ArmType::M2);
        let planar = simple_linkage_ik_rad(&g, 400.0, 0.0);
        assert!(!planar.shoulder.is_nan());
        assert!(!planar.elbow.is_nan());

        // The degenerate branch must agree with the general branch as the
        // height crosses the threshold.
        let near = simple_linkage_ik_rad(&g, 400.0, 1e-3);
        assert!((planar.shoulder - near.shoulder).abs() < 1e-4);
        assert!((planar.elbow - near.elbow).abs() < 1e-4);
    }

    #[test]
    fn m2_compensated_mode_tilt() {
        let g = geom(ArmType::M2);
        let joints = JointsRad::M2 {
            base: 0.0,
            shoulder: 0.3,
            elbow: 1.1,
            hand: 2.0,
        };
        let pose = forward(&g, &joints, EndEffectorMode::Compensated);
        match pose {
            Pose::M2 { mode, tilt, .. } => {
                assert_eq!(mode, EndEffectorMode::Compensated);
                let want = 2.0 - (PI - 0.3 - 1.1) + FRAC_PI_2;
                assert!((tilt - want).abs() < 1e-12);
            }
            _ => unreachable!(),
        }
    }
}
