use int_enum::IntEnum;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::f64::consts::PI;

use crate::limits::{self, ValueKind};
use crate::units;
use crate::{ArmType, RoarmError};

/// Wire operation codes. The firmware dispatches every inbound JSON
/// object on its integer `T` field.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
pub enum CommandCode {
    JointRadianCtrl = 101,
    JointsRadianCtrl = 102,
    FeedbackGet = 105,
    DynamicAdaptationSet = 112,
    LedCtrl = 114,
    JointAngleCtrl = 121,
    JointsAngleCtrl = 122,
    TorqueSet = 210,
    GripperModeSet = 222,
    WifiOnBoot = 401,
    ApSet = 402,
    StaSet = 403,
    ApStaSet = 404,
    WifiConfigCreateByStatus = 406,
    WifiConfigCreateByInput = 407,
    WifiStop = 408,
    MiddleSet = 502,
    EchoSet = 605,
    PoseCtrl = 1041,
}

/// One outbound command frame, ready for the wire.
///
/// Each variant carries exactly the fields its JSON object has, after
/// unit conversion and gripper mirroring. Construct through the typed
/// builders below; they validate against [`crate::limits`] first, so an
/// invalid frame never exists. Serializes to a single JSON object with
/// `"T"` as the first key.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    EchoSet {
        cmd: u8,
    },
    MiddleSet {
        id: u8,
    },
    LedCtrl {
        led: u8,
    },
    TorqueSet {
        cmd: u8,
    },
    DynamicAdaptationM2 {
        mode: u8,
        b: f64,
        s: f64,
        e: f64,
        h: f64,
    },
    DynamicAdaptationM3 {
        mode: u8,
        b: f64,
        s: f64,
        e: f64,
        t: f64,
        r: f64,
        h: f64,
    },
    FeedbackGet,
    JointRadianCtrl {
        joint: u8,
        rad: f64,
        spd: f64,
        acc: f64,
    },
    JointsRadianCtrlM2 {
        base: f64,
        shoulder: f64,
        elbow: f64,
        hand: f64,
        spd: f64,
        acc: f64,
    },
    JointsRadianCtrlM3 {
        base: f64,
        shoulder: f64,
        elbow: f64,
        wrist: f64,
        roll: f64,
        hand: f64,
        spd: f64,
        acc: f64,
    },
    JointAngleCtrl {
        joint: u8,
        angle: f64,
        spd: f64,
        acc: f64,
    },
    JointsAngleCtrlM2 {
        b: f64,
        s: f64,
        e: f64,
        h: f64,
        spd: f64,
        acc: f64,
    },
    JointsAngleCtrlM3 {
        b: f64,
        s: f64,
        e: f64,
        t: f64,
        r: f64,
        h: f64,
        spd: f64,
        acc: f64,
    },
    GripperModeSet {
        name: String,
        step: String,
    },
    PoseCtrlM2 {
        x: f64,
        y: f64,
        z: f64,
        t: f64,
    },
    PoseCtrlM3 {
        x: f64,
        y: f64,
        z: f64,
        t: f64,
        r: f64,
        g: f64,
    },
    WifiOnBoot {
        mode: u8,
    },
    ApSet {
        ssid: String,
        password: String,
    },
    StaSet {
        ssid: String,
        password: String,
    },
    ApStaSet {
        ap_ssid: String,
        ap_password: String,
        sta_ssid: String,
        sta_password: String,
    },
    WifiConfigCreateByStatus,
    WifiConfigCreateByInput {
        ap_ssid: String,
        ap_password: String,
        sta_ssid: String,
        sta_password: String,
    },
    WifiStop,
    /// Pass-through frame for a code with no arguments of its own.
    Bare {
        code: u16,
    },
}

impl Command {
    pub fn code(&self) -> u16 {
        let code = match self {
            Command::EchoSet { .. } => CommandCode::EchoSet,
            Command::MiddleSet { .. } => CommandCode::MiddleSet,
            Command::LedCtrl { .. } => CommandCode::LedCtrl,
            Command::TorqueSet { .. } => CommandCode::TorqueSet,
            Command::DynamicAdaptationM2 { .. } | Command::DynamicAdaptationM3 { .. } => {
                CommandCode::DynamicAdaptationSet
            }
            Command::FeedbackGet => CommandCode::FeedbackGet,
            Command::JointRadianCtrl { .. } => CommandCode::JointRadianCtrl,
            Command::JointsRadianCtrlM2 { .. } | Command::JointsRadianCtrlM3 { .. } => {
                CommandCode::JointsRadianCtrl
            }
            Command::JointAngleCtrl { .. } => CommandCode::JointAngleCtrl,
            Command::JointsAngleCtrlM2 { .. } | Command::JointsAngleCtrlM3 { .. } => {
                CommandCode::JointsAngleCtrl
            }
            Command::GripperModeSet { .. } => CommandCode::GripperModeSet,
            Command::PoseCtrlM2 { .. } | Command::PoseCtrlM3 { .. } => CommandCode::PoseCtrl,
            Command::WifiOnBoot { .. } => CommandCode::WifiOnBoot,
            Command::ApSet { .. } => CommandCode::ApSet,
            Command::StaSet { .. } => CommandCode::StaSet,
            Command::ApStaSet { .. } => CommandCode::ApStaSet,
            Command::WifiConfigCreateByStatus => CommandCode::WifiConfigCreateByStatus,
            Command::WifiConfigCreateByInput { .. } => CommandCode::WifiConfigCreateByInput,
            Command::WifiStop => CommandCode::WifiStop,
            Command::Bare { code } => return *code,
        };
        u16::from(code)
    }

    /// Whether this frame requests a telemetry response instead of being
    /// confirmed by its own echo.
    pub fn is_telemetry_request(&self) -> bool {
        matches!(self, Command::FeedbackGet)
    }

    /// The exact wire line: one JSON object terminated by `\n`.
    pub fn to_wire(&self) -> Result<String, RoarmError> {
        let json = serde_json::to_string(self)
            .map_err(|e| RoarmError::Serialization(e.to_string()))?;
        Ok(json + "\n")
    }

    pub fn echo_set(cmd: u8) -> Result<Self, RoarmError> {
        limits::check_cmd("cmd", cmd)?;
        Ok(Command::EchoSet { cmd })
    }

    pub fn middle_set() -> Self {
        Command::MiddleSet { id: 254 }
    }

    pub fn led_ctrl(led: u8) -> Self {
        Command::LedCtrl { led }
    }

    pub fn torque_set(cmd: u8) -> Result<Self, RoarmError> {
        limits::check_cmd("cmd", cmd)?;
        Ok(Command::TorqueSet { cmd })
    }

    pub fn dynamic_adaptation_set(
        arm: ArmType,
        mode: u8,
        torques: &[f64],
    ) -> Result<Self, RoarmError> {
        limits::check_cmd("mode", mode)?;
        limits::check_vector(arm, ValueKind::Torques, torques)?;
        Ok(match arm {
            ArmType::M2 => Command::DynamicAdaptationM2 {
                mode,
                b: torques[0],
                s: torques[1],
                e: torques[2],
                h: torques[3],
            },
            ArmType::M3 => Command::DynamicAdaptationM3 {
                mode,
                b: torques[0],
                s: torques[1],
                e: torques[2],
                t: torques[3],
                r: torques[4],
                h: torques[5],
            },
        })
    }

    pub fn feedback_get() -> Self {
        Command::FeedbackGet
    }

    pub fn joint_radian_ctrl(
        arm: ArmType,
        joint: u8,
        radian: f64,
        spd: f64,
        acc: f64,
    ) -> Result<Self, RoarmError> {
        limits::check_joint_value(arm, joint, ValueKind::Radians, radian)?;
        limits::check_speed(spd);
        limits::check_acc(acc);
        let rad = if joint == arm.gripper_joint() {
            units::mirror_rad(radian)
        } else {
            radian
        };
        Ok(Command::JointRadianCtrl {
            joint,
            rad,
            spd,
            acc,
        })
    }

    pub fn joints_radian_ctrl(
        arm: ArmType,
        radians: &[f64],
        spd: f64,
        acc: f64,
    ) -> Result<Self, RoarmError> {
        limits::check_vector(arm, ValueKind::Radians, radians)?;
        limits::check_speed(spd);
        limits::check_acc(acc);
        Ok(match arm {
            ArmType::M2 => Command::JointsRadianCtrlM2 {
                base: radians[0],
                shoulder: radians[1],
                elbow: radians[2],
                hand: units::mirror_rad(radians[3]),
                spd,
                acc,
            },
            ArmType::M3 => Command::JointsRadianCtrlM3 {
                base: radians[0],
                shoulder: radians[1],
                elbow: radians[2],
                wrist: radians[3],
                roll: radians[4],
                hand: units::mirror_rad(radians[5]),
                spd,
                acc,
            },
        })
    }

    pub fn joint_angle_ctrl(
        arm: ArmType,
        joint: u8,
        angle: f64,
        spd: f64,
        acc: f64,
    ) -> Result<Self, RoarmError> {
        limits::check_joint_value(arm, joint, ValueKind::Angles, angle)?;
        limits::check_speed(spd);
        limits::check_acc(acc);
        let angle = if joint == arm.gripper_joint() {
            units::mirror_angle(angle)
        } else {
            angle
        };
        Ok(Command::JointAngleCtrl {
            joint,
            angle,
            spd: units::speed_ticks_to_angle(spd),
            acc: units::acc_ticks_to_angle(acc),
        })
    }

    pub fn joints_angle_ctrl(
        arm: ArmType,
        angles: &[f64],
        spd: f64,
        acc: f64,
    ) -> Result<Self, RoarmError> {
        limits::check_vector(arm, ValueKind::Angles, angles)?;
        limits::check_speed(spd);
        limits::check_acc(acc);
        let spd = units::speed_ticks_to_angle(spd);
        let acc = units::acc_ticks_to_angle(acc);
        Ok(match arm {
            ArmType::M2 => Command::JointsAngleCtrlM2 {
                b: angles[0],
                s: angles[1],
                e: angles[2],
                h: units::mirror_angle(angles[3]),
                spd,
                acc,
            },
            ArmType::M3 => Command::JointsAngleCtrlM3 {
                b: angles[0],
                s: angles[1],
                e: angles[2],
                t: angles[3],
                r: angles[4],
                h: units::mirror_angle(angles[5]),
                spd,
                acc,
            },
        })
    }

    /// The firmware takes the gripper mode as a nested one-line JSON
    /// string under `step`, not as a plain field.
    pub fn gripper_mode_set(mode: u8) -> Result<Self, RoarmError> {
        limits::check_cmd("mode", mode)?;
        let step = serde_json::json!({ "T": 1, "mode": mode }).to_string();
        Ok(Command::GripperModeSet {
            name: "boot".to_string(),
            step,
        })
    }

    /// Cartesian pose goal. Orientation components arrive in degrees (the
    /// limit tables speak degrees) and leave in radians, with the gripper
    /// component mirrored.
    pub fn pose_ctrl(arm: ArmType, pose: &[f64]) -> Result<Self, RoarmError> {
        limits::check_vector(arm, ValueKind::Positions, pose)?;
        Ok(match arm {
            ArmType::M2 => Command::PoseCtrlM2 {
                x: pose[0],
                y: pose[1],
                z: pose[2],
                t: PI - units::angle_to_radian(pose[3]),
            },
            ArmType::M3 => Command::PoseCtrlM3 {
                x: pose[0],
                y: pose[1],
                z: pose[2],
                t: units::angle_to_radian(pose[3]),
                r: units::angle_to_radian(pose[4]),
                g: PI - units::angle_to_radian(pose[5]),
            },
        })
    }

    pub fn wifi_on_boot(wifi_cmd: u8) -> Result<Self, RoarmError> {
        limits::check_wifi_cmd(wifi_cmd)?;
        Ok(Command::WifiOnBoot { mode: wifi_cmd })
    }

    pub fn ap_set(ssid: &str, password: &str) -> Self {
        Command::ApSet {
            ssid: ssid.to_string(),
            password: password.to_string(),
        }
    }

    pub fn sta_set(ssid: &str, password: &str) -> Self {
        Command::StaSet {
            ssid: ssid.to_string(),
            password: password.to_string(),
        }
    }

    pub fn apsta_set(
        ap_ssid: &str,
        ap_password: &str,
        sta_ssid: &str,
        sta_password: &str,
    ) -> Self {
        Command::ApStaSet {
            ap_ssid: ap_ssid.to_string(),
            ap_password: ap_password.to_string(),
            sta_ssid: sta_ssid.to_string(),
            sta_password: sta_password.to_string(),
        }
    }

    pub fn wifi_config_create_by_status() -> Self {
        Command::WifiConfigCreateByStatus
    }

    pub fn wifi_config_create_by_input(
        ap_ssid: &str,
        ap_password: &str,
        sta_ssid: &str,
        sta_password: &str,
    ) -> Self {
        Command::WifiConfigCreateByInput {
            ap_ssid: ap_ssid.to_string(),
            ap_password: ap_password.to_string(),
            sta_ssid: sta_ssid.to_string(),
            sta_password: sta_password.to_string(),
        }
    }

    pub fn wifi_stop() -> Self {
        Command::WifiStop
    }

    pub fn bare(code: u16) -> Self {
        Command::Bare { code }
    }
}

impl Serialize for Command {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("T", &self.code())?;
        match self {
            Command::EchoSet { cmd } | Command::TorqueSet { cmd } => {
                map.serialize_entry("cmd", cmd)?;
            }
            Command::MiddleSet { id } => {
                map.serialize_entry("id", id)?;
            }
            Command::LedCtrl { led } => {
                map.serialize_entry("led", led)?;
            }
            Command::DynamicAdaptationM2 { mode, b, s, e, h } => {
                map.serialize_entry("mode", mode)?;
                map.serialize_entry("b", b)?;
                map.serialize_entry("s", s)?;
                map.serialize_entry("e", e)?;
                map.serialize_entry("h", h)?;
            }
            Command::DynamicAdaptationM3 {
                mode,
                b,
                s,
                e,
                t,
                r,
                h,
            } => {
                map.serialize_entry("mode", mode)?;
                map.serialize_entry("b", b)?;
                map.serialize_entry("s", s)?;
                map.serialize_entry("e", e)?;
                map.serialize_entry("t", t)?;
                map.serialize_entry("r", r)?;
                map.serialize_entry("h", h)?;
            }
            Command::JointRadianCtrl {
                joint,
                rad,
                spd,
                acc,
            } => {
                map.serialize_entry("joint", joint)?;
                map.serialize_entry("rad", rad)?;
                map.serialize_entry("spd", spd)?;
                map.serialize_entry("acc", acc)?;
            }
            Command::JointsRadianCtrlM2 {
                base,
                shoulder,
                elbow,
                hand,
                spd,
                acc,
            } => {
                map.serialize_entry("base", base)?;
                map.serialize_entry("shoulder", shoulder)?;
                map.serialize_entry("elbow", elbow)?;
                map.serialize_entry("hand", hand)?;
                map.serialize_entry("spd", spd)?;
                map.serialize_entry("acc", acc)?;
            }
            Command::JointsRadianCtrlM3 {
                base,
                shoulder,
                elbow,
                wrist,
                roll,
                hand,
                spd,
                acc,
            } => {
                map.serialize_entry("base", base)?;
                map.serialize_entry("shoulder", shoulder)?;
                map.serialize_entry("elbow", elbow)?;
                map.serialize_entry("wrist", wrist)?;
                map.serialize_entry("roll", roll)?;
                map.serialize_entry("hand", hand)?;
                map.serialize_entry("spd", spd)?;
                map.serialize_entry("acc", acc)?;
            }
            Command::JointAngleCtrl {
                joint,
                angle,
                spd,
                acc,
            } => {
                map.serialize_entry("joint", joint)?;
                map.serialize_entry("angle", angle)?;
                map.serialize_entry("spd", spd)?;
                map.serialize_entry("acc", acc)?;
            }
            Command::JointsAngleCtrlM2 {
                b,
                s,
                e,
                h,
                spd,
                acc,
            } => {
                map.serialize_entry("b", b)?;
                map.serialize_entry("s", s)?;
                map.serialize_entry("e", e)?;
                map.serialize_entry("h", h)?;
                map.serialize_entry("spd", spd)?;
                map.serialize_entry("acc", acc)?;
            }
            Command::JointsAngleCtrlM3 {
                b,
                s,
                e,
                t,
                r,
                h,
                spd,
                acc,
            } => {
                map.serialize_entry("b", b)?;
                map.serialize_entry("s", s)?;
                map.serialize_entry("e", e)?;
                map.serialize_entry("t", t)?;
                map.serialize_entry("r", r)?;
                map.serialize_entry("h", h)?;
                map.serialize_entry("spd", spd)?;
                map.serialize_entry("acc", acc)?;
            }
            Command::GripperModeSet { name, step } => {
                map.serialize_entry("name", name)?;
                map.serialize_entry("step", step)?;
            }
            Command::PoseCtrlM2 { x, y, z, t } => {
                map.serialize_entry("x", x)?;
                map.serialize_entry("y", y)?;
                map.serialize_entry("z", z)?;
                map.serialize_entry("t", t)?;
            }
            Command::PoseCtrlM3 { x, y, z, t, r, g } => {
                map.serialize_entry("x", x)?;
                map.serialize_entry("y", y)?;
                map.serialize_entry("z", z)?;
                map.serialize_entry("t", t)?;
                map.serialize_entry("r", r)?;
                map.serialize_entry("g", g)?;
            }
            Command::WifiOnBoot { mode } => {
                map.serialize_entry("mode", mode)?;
            }
            Command::ApSet { ssid, password } | Command::StaSet { ssid, password } => {
                map.serialize_entry("ssid", ssid)?;
                map.serialize_entry("password", password)?;
            }
            Command::ApStaSet {
                ap_ssid,
                ap_password,
                sta_ssid,
                sta_password,
            }
            | Command::WifiConfigCreateByInput {
                ap_ssid,
                ap_password,
                sta_ssid,
                sta_password,
            } => {
                map.serialize_entry("ap_ssid", ap_ssid)?;
                map.serialize_entry("ap_password", ap_password)?;
                map.serialize_entry("sta_ssid", sta_ssid)?;
                map.serialize_entry("sta_password", sta_password)?;
            }
            Command::FeedbackGet
            | Command::WifiConfigCreateByStatus
            | Command::WifiStop
            | Command::Bare { .. } => {}
        }
        map.end()
    }
}
