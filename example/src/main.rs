use std::env;
use std::time::Duration;

use tokio::time::sleep;

use roarm_sdk::drivers::{RoarmDriver, RoarmDriverConfig, TransportConfig};
use roarm_sdk::geometry::ArmGeometry;
use roarm_sdk::kinematics::{self, IkCache};
use roarm_sdk::{ArmType, EndEffectorMode, Pose, RoarmError};

/// Usage:
///   example serial /dev/ttyUSB0
///   example http 192.168.4.1
///   example socket ws://localhost:9090
/// An `m3` third argument selects the 6-DOF arm (default is 4-DOF).
fn parse_config() -> RoarmDriverConfig {
    let args: Vec<String> = env::args().collect();
    let transport = match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("http"), Some(host)) => TransportConfig::Http { host: host.clone() },
        (Some("socket"), Some(url)) => TransportConfig::Socket { url: url.clone() },
        (Some("serial"), Some(port)) => TransportConfig::Serial {
            port: port.clone(),
            baud: roarm_sdk::drivers::DEFAULT_BAUDRATE,
        },
        _ => return RoarmDriverConfig::default(),
    };
    let arm = match args.get(3).map(String::as_str) {
        Some("m3") => ArmType::M3,
        _ => ArmType::M2,
    };
    RoarmDriverConfig::new(arm, transport)
}

#[tokio::main]
async fn main() -> Result<(), RoarmError> {
    tracing_subscriber::fmt::init();

    let config = parse_config();
    println!("connecting to {:?}", config.transport);

    let mut driver = match RoarmDriver::connect(config.clone()).await {
        Ok(driver) => {
            println!("Connected successfully");
            driver
        }
        Err(e) => {
            println!("Failed to connect to {:?} : {}", config, e);
            return Err(e);
        }
    };

    driver.echo_set(0).await?;
    driver.move_init().await?;
    sleep(Duration::from_secs(2)).await;

    let joints = driver.joints_radian_get().await?;
    println!("joints (rad): {:?}", joints);

    let pose = driver.pose_get().await?;
    println!("pose: {:?}", pose);

    // Chain a small Cartesian move through the local solver: solve the
    // goal offline, then command the joint-space result.
    let arm = driver.config.arm;
    let geom = ArmGeometry::new(arm);
    let mut cache = IkCache::new(arm);
    let (hx, hy, hz) = geom.home_position();
    let goal = match arm {
        ArmType::M2 => Pose::M2 {
            x: hx - 40.0,
            y: hy,
            z: hz + 20.0,
            mode: EndEffectorMode::Direct,
            tilt: 0.0,
        },
        ArmType::M3 => Pose::M3 {
            x: hx - 40.0,
            y: hy,
            z: hz + 20.0,
            roll: 0.0,
            tilt: 0.0,
        },
    };
    let solution = kinematics::inverse(&geom, &goal, 0.0, &mut cache);
    println!("ik solution: {:?}", solution);
    driver
        .joints_radian_ctrl(&solution.to_vec(), 100.0, 0.0)
        .await?;
    sleep(Duration::from_secs(2)).await;

    let reported = driver.pose_get().await?;
    println!("pose after move: {:?}", reported);

    driver.breath_led(1.0, 10).await?;
    driver.disconnect().await;
    Ok(())
}
