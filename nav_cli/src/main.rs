//! # Navigation Command Line
//!
//! Interactive console which sends requests to the navigation executable, allowing an operator
//! to stand in for the simulator or to tune the controllers while it runs.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{Result, eyre::{eyre, WrapErr}};
use log::warn;
use rustyline::{error::ReadlineError, DefaultEditor};
use structopt::{clap::AppSettings, StructOpt};

use comms_if::{
    nav::{NavRequest, NavResponse, PidGains, PlayerPos, PoseReport},
    net::{zmq, create_socket, NetParams, SocketOptions},
};
use util::logger::{console_init, LevelFilter};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "nav $ ";
const HISTORY_PATH: &str = "data/history.txt";

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A console command.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "nav",
    setting = AppSettings::NoBinaryName,
    global_setting = AppSettings::AllowNegativeNumbers,
    global_setting = AppSettings::DisableVersion,
)]
enum Cmd {
    /// Report a pose as the simulator would
    Pose {
        x: f64,
        z: f64,
        y: f64,
        /// Speed in meters/second
        speed: f64,
        /// Heading in degrees
        heading: f64,
    },

    /// Request the move command for this cycle
    Move,

    /// Set the destination
    Dest { x: f64, y: f64, z: f64 },

    /// Set the speed controller gains
    SpeedGains { kp: f64, ki: f64, kd: f64 },

    /// Set the steering controller gains
    SteerGains { kp: f64, ki: f64, kd: f64 },

    /// Set the target speed in kilometers/hour
    TargetSpeed { kmh: f64 },

    /// Set the target heading in degrees
    TargetHeading { deg: f64 },

    /// Show the navigation state
    Status,

    /// Stop the navigation executable
    Shutdown,

    /// Leave the console
    Exit,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    console_init(LevelFilter::Info)
        .wrap_err("Failed to initialise logging")?;

    let net_params: NetParams = util::params::load("net.toml")
        .wrap_err("Could not load the network parameters")?;

    let ctx = zmq::Context::new();
    let socket = create_socket(
        &ctx,
        zmq::REQ,
        SocketOptions {
            req_correlate: true,
            req_relaxed: true,
            recv_timeout: 2000,
            send_timeout: 1000,
            linger: 0,
            ..Default::default()
        },
        &net_params.nav_endpoint
    ).wrap_err("Could not connect to the navigation executable")?;

    let mut rl = DefaultEditor::new()?;
    if rl.load_history(HISTORY_PATH).is_err() {
        println!("No history detected");
    }

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                println!("Unhandled Error: {:?}", e);
                break
            }
        };

        if line.trim().is_empty() {
            continue
        }
        rl.add_history_entry(line.as_str()).ok();

        let cmd = match Cmd::from_iter_safe(line.split_whitespace()) {
            Ok(c) => c,
            Err(e) => {
                println!("{}", e.message);
                continue
            }
        };

        let request = match cmd {
            Cmd::Exit => break,
            c => to_request(c),
        };

        match send_request(&socket, &request) {
            Ok(NavResponse::Status(s)) => println!("{:#?}", s),
            Ok(NavResponse::Move(m)) => println!("{:?} speed = {:.3} m/s, yaw = {:.2} deg",
                m.command, m.speed, m.yaw),
            Ok(NavResponse::Success) => println!("OK"),
            Ok(NavResponse::Error(e)) => println!("Server error: {}", e),
            Err(e) => warn!("{:?}", e),
        }
    }

    if let Err(e) = rl.save_history(HISTORY_PATH) {
        warn!("Could not save the history: {}", e);
    }

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn to_request(cmd: Cmd) -> NavRequest {
    match cmd {
        Cmd::Pose { x, z, y, speed, heading } => NavRequest::Info(PoseReport {
            player_pos: Some(PlayerPos { x, z, y }),
            player_speed: speed,
            player_body_x: heading,
        }),
        Cmd::Move => NavRequest::GetMove,
        Cmd::Dest { x, y, z } => NavRequest::SetDestination { x, y, z },
        Cmd::SpeedGains { kp, ki, kd } => NavRequest::SetSpeedGains(PidGains { kp, ki, kd }),
        Cmd::SteerGains { kp, ki, kd } => NavRequest::SetSteerGains(PidGains { kp, ki, kd }),
        Cmd::TargetSpeed { kmh } => NavRequest::SetTargetSpeed { kmh },
        Cmd::TargetHeading { deg } => NavRequest::SetTargetHeading { deg },
        Cmd::Status => NavRequest::GetStatus,
        Cmd::Shutdown | Cmd::Exit => NavRequest::Shutdown,
    }
}

fn send_request(socket: &zmq::Socket, request: &NavRequest) -> Result<NavResponse> {
    let req_str = serde_json::to_string(request)?;

    socket.send(&req_str, 0)
        .wrap_err("Could not send the request")?;

    let resp_str = socket.recv_string(0)
        .wrap_err("No response from the navigation executable")?
        .map_err(|_| eyre!("Response was not valid UTF-8"))?;

    serde_json::from_str(&resp_str)
        .wrap_err("Could not parse the response")
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(line: &str) -> Result<Cmd, structopt::clap::Error> {
        Cmd::from_iter_safe(line.split_whitespace())
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(
            to_request(parse("target-heading -90").unwrap()),
            NavRequest::SetTargetHeading { deg } if deg == -90.0
        ));
        assert!(matches!(
            to_request(parse("dest 100 100 0").unwrap()),
            NavRequest::SetDestination { x, y, z } if x == 100.0 && y == 100.0 && z == 0.0
        ));
        assert_eq!(
            to_request(parse("speed-gains 0.5 0.1 0.05").unwrap()),
            NavRequest::SetSpeedGains(PidGains { kp: 0.5, ki: 0.1, kd: 0.05 })
        );
        assert_eq!(to_request(parse("move").unwrap()), NavRequest::GetMove);
        assert!(matches!(parse("exit").unwrap(), Cmd::Exit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("dest 1 2").is_err());
        assert!(parse("target-speed fast").is_err());
        assert!(parse("fly").is_err());
    }
}
