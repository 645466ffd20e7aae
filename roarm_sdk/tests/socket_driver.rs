//! End-to-end driver cycle against a stub device on a local WebSocket.
#![cfg(feature = "driver")]

use std::f64::consts::PI;
use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use roarm_sdk::drivers::{RoarmDriver, RoarmDriverConfig, TransportConfig};
use roarm_sdk::{ArmType, RoarmError};

const FEEDBACK_M3: &str = r#"{"T":1051,"x":346.16,"y":0.0,"z":223.13,"tit":0.0,"b":0.0,"s":0.0,"e":1.5708,"t":0.0,"r":0.0,"g":3.141592653589793,"tB":0,"tS":0,"tE":0,"tT":0,"tR":0,"tG":0}"#;

/// Accepts one connection and answers every feedback request with a
/// canned telemetry frame. Other commands are swallowed like the real
/// firmware does.
async fn spawn_device(answer_telemetry: bool) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                let value: serde_json::Value = serde_json::from_str(&text).unwrap();
                if value["T"] == 105 && answer_telemetry {
                    ws.send(Message::Text(FEEDBACK_M3.to_string()))
                        .await
                        .unwrap();
                }
            }
        }
    });
    addr
}

fn config(addr: SocketAddr, timeout_ms: u64) -> RoarmDriverConfig {
    RoarmDriverConfig {
        arm: ArmType::M3,
        transport: TransportConfig::Socket {
            url: format!("ws://{addr}"),
        },
        timeout_ms,
    }
}

#[tokio::test]
async fn test_command_then_telemetry_round_trip() {
    let addr = spawn_device(true).await;
    let mut driver = RoarmDriver::connect(config(addr, 2000)).await.unwrap();

    // Fire-and-forget command: confirmed by its own echo.
    driver
        .joints_radian_ctrl(&[0.0, 0.0, 1.5708, 0.0, 0.0, 0.0], 100.0, 0.0)
        .await
        .unwrap();

    let joints = driver.joints_radian_get().await.unwrap();
    assert_eq!(joints.len(), 6);
    assert_eq!(&joints[..5], &[0.0, 0.0, 1.5708, 0.0, 0.0]);
    // Raw servo gripper value pi reads back as a zero hand angle.
    assert!(joints[5].abs() < 1e-12);

    let pose = driver.pose_get().await.unwrap();
    assert_eq!(&pose[..3], &[346.16, 0.0, 223.13]);

    let gripper = driver.gripper_angle_get().await.unwrap();
    assert!(gripper.abs() < 1e-9);

    driver.disconnect().await;
}

#[tokio::test]
async fn test_silent_device_exhausts_retries() {
    let addr = spawn_device(false).await;
    let mut driver = RoarmDriver::connect(config(addr, 20)).await.unwrap();

    let result = driver.feedback_get().await;
    assert_eq!(result, Err(RoarmError::RetriesExhausted));

    driver.disconnect().await;
}

#[tokio::test]
async fn test_validation_aborts_without_touching_the_wire() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let frames_seen = Arc::new(AtomicUsize::new(0));
    let counter = frames_seen.clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if matches!(message, Message::Text(_)) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }
    });

    let mut driver = RoarmDriver::connect(config(addr, 2000)).await.unwrap();
    let result = driver.joint_radian_ctrl(9, 0.0, 100.0, 0.0).await;
    assert!(matches!(result, Err(RoarmError::Validation(_))));

    let result = driver
        .pose_ctrl(&[0.0, 0.0, 700.0, 0.0, 0.0, 0.0])
        .await;
    assert!(matches!(result, Err(RoarmError::Validation(_))));

    driver.disconnect().await;
    // Out-of-range arguments fail at encode time; nothing was sent.
    assert_eq!(frames_seen.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_gripper_round_trip_mirrors_twice() {
    let addr = spawn_device(true).await;
    let mut driver = RoarmDriver::connect(config(addr, 2000)).await.unwrap();

    // The canned frame reports the raw servo value pi; two mirror
    // applications cancel, so the caller sees pi - pi = 0 and commanding
    // that same angle re-encodes to the raw value.
    let read_back = driver.gripper_radian_get().await.unwrap();
    driver.gripper_radian_ctrl(read_back, 100.0, 0.0).await.unwrap();
    assert!((read_back - (PI - PI)).abs() < 1e-12);

    driver.disconnect().await;
}
