use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::sleep;

use crate::packets::{Command, Feedback};
use crate::transport::Link;
use crate::units;
use crate::RoarmError;

use super::RoarmDriverConfig;

/// Upper bound on send attempts per logical operation.
pub const MAX_TRIES: u32 = 10;

/// Drive one attempt closure through the bounded retry cycle.
///
/// The closure receives the shared transport state and the zero-based
/// attempt number, and reports `Ok(Some(data))` on success, `Ok(None)`
/// when the attempt produced nothing, or `Err` for a transport fault.
/// Faults are logged and retried like empty attempts; running out of
/// attempts yields [`RoarmError::RetriesExhausted`], which callers must
/// treat as "operation not confirmed" rather than a crash.
pub async fn request_with_retries<S, T, F>(
    state: &mut S,
    max_tries: u32,
    mut attempt: F,
) -> Result<T, RoarmError>
where
    F: for<'a> FnMut(
        &'a mut S,
        u32,
    )
        -> Pin<Box<dyn Future<Output = Result<Option<T>, RoarmError>> + 'a>>,
{
    let mut try_count = 0;
    while try_count < max_tries {
        match attempt(state, try_count).await {
            Ok(Some(data)) => return Ok(data),
            Ok(None) => {}
            Err(e) => tracing::warn!("send attempt {} failed: {}", try_count + 1, e),
        }
        try_count += 1;
    }
    Err(RoarmError::RetriesExhausted)
}

/// Connection to one arm over one configured transport.
///
/// All methods mirror the firmware's command set; angle-domain methods
/// speak degrees and raw servo speed/acceleration ticks, radian-domain
/// methods speak radians. Gripper mirroring and unit scaling happen at
/// encode time, so values read back through the telemetry getters land in
/// the same frame the caller commanded.
pub struct RoarmDriver {
    pub config: RoarmDriverConfig,
    link: Link,
}

impl RoarmDriver {
    /// Establishes a connection to an arm.
    ///
    /// Opens the transport named by the configuration (serial port, HTTP
    /// host, or persistent socket). No frame is exchanged at connect
    /// time; the firmware accepts commands as soon as the link is up.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the transport
    /// cannot be opened.
    pub async fn connect(config: RoarmDriverConfig) -> Result<Self, RoarmError> {
        config.validate().map_err(RoarmError::Validation)?;
        let link = Link::connect(&config.transport).await?;
        Ok(Self { config, link })
    }

    /// Send a raw command frame, retrying up to [`MAX_TRIES`] times.
    /// Non-telemetry frames are confirmed by their own echo.
    pub async fn send_command(&mut self, command: &Command) -> Result<(), RoarmError> {
        let line = command.to_wire()?;
        let read_timeout = Duration::from_millis(self.config.timeout_ms);
        tracing::debug!("send: {}", line.trim_end());
        request_with_retries(&mut self.link, MAX_TRIES, |link, _| {
            let line = line.clone();
            Box::pin(async move {
                Ok(link
                    .request(&line, false, read_timeout)
                    .await?
                    .map(|_| ()))
            })
        })
        .await
    }

    /// Request one telemetry frame, retrying up to [`MAX_TRIES`] times.
    /// A frame that fails to parse counts as a failed attempt.
    pub async fn feedback_get(&mut self) -> Result<Feedback, RoarmError> {
        let line = Command::feedback_get().to_wire()?;
        let read_timeout = Duration::from_millis(self.config.timeout_ms);
        request_with_retries(&mut self.link, MAX_TRIES, |link, _| {
            let line = line.clone();
            Box::pin(async move {
                match link.request(&line, true, read_timeout).await? {
                    None => Ok(None),
                    Some(raw) => match serde_json::from_str::<Feedback>(raw.trim()) {
                        Ok(feedback) => {
                            tracing::debug!("received: {}", raw.trim());
                            Ok(Some(feedback))
                        }
                        Err(e) => {
                            tracing::warn!("JSON decode error: {}", e);
                            Ok(None)
                        }
                    },
                }
            })
        })
        .await
    }

    pub async fn echo_set(&mut self, cmd: u8) -> Result<(), RoarmError> {
        let command = Command::echo_set(cmd)?;
        self.send_command(&command).await
    }

    /// Store the current posture as the servos' middle position.
    pub async fn middle_set(&mut self) -> Result<(), RoarmError> {
        self.send_command(&Command::middle_set()).await
    }

    /// Move to the straight-up initial posture.
    pub async fn move_init(&mut self) -> Result<(), RoarmError> {
        let radians: &[f64] = match self.config.arm {
            crate::ArmType::M2 => &[0.0, 0.0, 1.5708, 0.0],
            crate::ArmType::M3 => &[0.0, 0.0, 1.5708, 0.0, 0.0, 0.0],
        };
        self.joints_radian_ctrl(radians, 100.0, 0.0).await
    }

    pub async fn led_ctrl(&mut self, led: u8) -> Result<(), RoarmError> {
        self.send_command(&Command::led_ctrl(led)).await
    }

    /// Ramp the LED up to full and back down once. Convenience wrapper
    /// over [`Self::led_ctrl`]; timing is best-effort.
    pub async fn breath_led(&mut self, duration_s: f64, steps: u32) -> Result<(), RoarmError> {
        let steps = steps.max(1);
        let pause = Duration::from_secs_f64(duration_s / (2 * steps) as f64);
        for i in 0..=steps {
            let led = (i as f64 / steps as f64 * 255.0) as u8;
            self.led_ctrl(led).await?;
            sleep(pause).await;
        }
        for i in 0..=steps {
            let led = ((1.0 - i as f64 / steps as f64) * 255.0) as u8;
            self.led_ctrl(led).await?;
            sleep(pause).await;
        }
        Ok(())
    }

    pub async fn torque_set(&mut self, cmd: u8) -> Result<(), RoarmError> {
        let command = Command::torque_set(cmd)?;
        self.send_command(&command).await
    }

    pub async fn dynamic_adaptation_set(
        &mut self,
        mode: u8,
        torques: &[f64],
    ) -> Result<(), RoarmError> {
        let command = Command::dynamic_adaptation_set(self.config.arm, mode, torques)?;
        self.send_command(&command).await
    }

    pub async fn joint_radian_ctrl(
        &mut self,
        joint: u8,
        radian: f64,
        spd: f64,
        acc: f64,
    ) -> Result<(), RoarmError> {
        let command = Command::joint_radian_ctrl(self.config.arm, joint, radian, spd, acc)?;
        self.send_command(&command).await
    }

    pub async fn joints_radian_ctrl(
        &mut self,
        radians: &[f64],
        spd: f64,
        acc: f64,
    ) -> Result<(), RoarmError> {
        let command = Command::joints_radian_ctrl(self.config.arm, radians, spd, acc)?;
        self.send_command(&command).await
    }

    /// Current joint vector, radians.
    pub async fn joints_radian_get(&mut self) -> Result<Vec<f64>, RoarmError> {
        Ok(self.feedback_get().await?.joints_rad())
    }

    pub async fn joint_angle_ctrl(
        &mut self,
        joint: u8,
        angle: f64,
        spd: f64,
        acc: f64,
    ) -> Result<(), RoarmError> {
        let command = Command::joint_angle_ctrl(self.config.arm, joint, angle, spd, acc)?;
        self.send_command(&command).await
    }

    pub async fn joints_angle_ctrl(
        &mut self,
        angles: &[f64],
        spd: f64,
        acc: f64,
    ) -> Result<(), RoarmError> {
        let command = Command::joints_angle_ctrl(self.config.arm, angles, spd, acc)?;
        self.send_command(&command).await
    }

    /// Current joint vector, degrees.
    pub async fn joints_angle_get(&mut self) -> Result<Vec<f64>, RoarmError> {
        let radians = self.joints_radian_get().await?;
        Ok(radians.iter().map(|r| units::radian_to_angle(*r)).collect())
    }

    pub async fn gripper_mode_set(&mut self, mode: u8) -> Result<(), RoarmError> {
        let command = Command::gripper_mode_set(mode)?;
        self.send_command(&command).await
    }

    pub async fn gripper_radian_ctrl(
        &mut self,
        radian: f64,
        spd: f64,
        acc: f64,
    ) -> Result<(), RoarmError> {
        let gripper = self.config.arm.gripper_joint();
        self.joint_radian_ctrl(gripper, radian, spd, acc).await
    }

    pub async fn gripper_angle_ctrl(
        &mut self,
        angle: f64,
        spd: f64,
        acc: f64,
    ) -> Result<(), RoarmError> {
        let gripper = self.config.arm.gripper_joint();
        self.joint_angle_ctrl(gripper, angle, spd, acc).await
    }

    pub async fn gripper_radian_get(&mut self) -> Result<f64, RoarmError> {
        Ok(self.feedback_get().await?.gripper_rad())
    }

    pub async fn gripper_angle_get(&mut self) -> Result<f64, RoarmError> {
        Ok(units::radian_to_angle(
            self.feedback_get().await?.gripper_rad(),
        ))
    }

    /// Cartesian pose goal: `[x, y, z, t]` for the 4-DOF arm,
    /// `[x, y, z, t, r, g]` for the 6-DOF arm; millimeters and degrees.
    pub async fn pose_ctrl(&mut self, pose: &[f64]) -> Result<(), RoarmError> {
        let command = Command::pose_ctrl(self.config.arm, pose)?;
        self.send_command(&command).await
    }

    /// Current pose vector, millimeters and degrees.
    pub async fn pose_get(&mut self) -> Result<Vec<f64>, RoarmError> {
        Ok(self.feedback_get().await?.pose_vec())
    }

    pub async fn wifi_on_boot(&mut self, wifi_cmd: u8) -> Result<(), RoarmError> {
        let command = Command::wifi_on_boot(wifi_cmd)?;
        self.send_command(&command).await
    }

    pub async fn ap_set(&mut self, ssid: &str, password: &str) -> Result<(), RoarmError> {
        self.send_command(&Command::ap_set(ssid, password)).await
    }

    pub async fn sta_set(&mut self, ssid: &str, password: &str) -> Result<(), RoarmError> {
        self.send_command(&Command::sta_set(ssid, password)).await
    }

    pub async fn apsta_set(
        &mut self,
        ap_ssid: &str,
        ap_password: &str,
        sta_ssid: &str,
        sta_password: &str,
    ) -> Result<(), RoarmError> {
        self.send_command(&Command::apsta_set(ap_ssid, ap_password, sta_ssid, sta_password))
            .await
    }

    pub async fn wifi_config_create_by_status(&mut self) -> Result<(), RoarmError> {
        self.send_command(&Command::wifi_config_create_by_status())
            .await
    }

    pub async fn wifi_config_create_by_input(
        &mut self,
        ap_ssid: &str,
        ap_password: &str,
        sta_ssid: &str,
        sta_password: &str,
    ) -> Result<(), RoarmError> {
        self.send_command(&Command::wifi_config_create_by_input(
            ap_ssid,
            ap_password,
            sta_ssid,
            sta_password,
        ))
        .await
    }

    pub async fn wifi_stop(&mut self) -> Result<(), RoarmError> {
        self.send_command(&Command::wifi_stop()).await
    }

    pub async fn disconnect(&mut self) {
        self.link.close().await;
    }
}
