//! # Navigation Server Module
//!
//! This module abstracts over the networking side of the navigation executable. The server binds
//! a REP socket which accepts JSON requests from the simulator bridge and from the operator
//! console, and answers each one with a JSON response.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    nav::{NavRequest, NavResponse},
    net::{zmq, create_socket, NetError, NetParams, SocketOptions},
};
use log::warn;

use crate::{nav::Navigation, pose_log::PoseLog};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An abstraction over the networking part of the navigation executable.
pub struct NavServer {
    /// REP socket which accepts requests from clients
    socket: zmq::Socket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur in the [`NavServer`]
#[derive(thiserror::Error, Debug)]
pub enum NavServerError {
    #[error("Socket error: {0}")]
    SocketError(#[from] NetError),

    #[error("Could not receive from the client: {0}")]
    RecvError(zmq::Error),

    #[error("Could not deserialize the request: {0}")]
    InvalidRequest(serde_json::Error),

    #[error("Could not serialize the response: {0}")]
    SerializationError(serde_json::Error),

    #[error("Could not send data to the client: {0}")]
    SendError(zmq::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavServer {

    /// Create a new instance of the navigation server bound to `nav_bind_endpoint`.
    ///
    /// This function will not wait for a connection from a client before returning.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, NavServerError> {
        let socket_options = SocketOptions {
            bind: true,
            recv_timeout: 200,
            send_timeout: 10,
            linger: 0,
            ..Default::default()
        };

        let socket = create_socket(
            ctx,
            zmq::REP,
            socket_options,
            &params.nav_bind_endpoint
        )?;

        Ok(Self { socket })
    }

    /// Retrieve a request from a client.
    ///
    /// `Ok(None)` is returned if nothing arrived before the receive timeout. A request which
    /// couldn't be parsed is a [`NavServerError::InvalidRequest`], after which the user MUST still
    /// call [`NavServer::send_response`], as for any valid request. Any other error is a socket
    /// failure.
    pub fn get_request(&mut self) -> Result<Option<NavRequest>, NavServerError> {
        let msg = match self.socket.recv_msg(0) {
            Ok(m) => m,
            Err(zmq::Error::EAGAIN) => return Ok(None),
            Err(e) => return Err(NavServerError::RecvError(e))
        };

        serde_json::from_str(msg.as_str().unwrap_or(""))
            .map(Some)
            .map_err(NavServerError::InvalidRequest)
    }

    /// Send a response to the last request.
    pub fn send_response(&mut self, response: &NavResponse) -> Result<(), NavServerError> {
        let resp_str = serde_json::to_string(response)
            .map_err(NavServerError::SerializationError)?;

        self.socket.send(&resp_str, 0)
            .map_err(NavServerError::SendError)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Apply a request to the navigation system and build the response.
///
/// Pose reports are written to the pose log, if one is open, after the navigation state has been
/// updated. `Shutdown` is acknowledged here and acted on by the caller.
pub fn dispatch(
    nav: &Navigation,
    pose_log: Option<&mut PoseLog>,
    request: NavRequest,
    move_dt_s: f64
) -> NavResponse {
    match request {
        NavRequest::Info(report) => {
            nav.report_pose(&report);

            if let Some(log) = pose_log {
                if let Err(e) = log.record(&report) {
                    warn!("Could not write to the pose log: {}", e);
                }
            }

            NavResponse::Success
        },
        NavRequest::GetMove => NavResponse::Move(nav.get_move(move_dt_s)),
        NavRequest::SetDestination { x, y, z } => {
            nav.set_destination(x, y, z);
            NavResponse::Success
        },
        NavRequest::SetSpeedGains(gains) => {
            nav.set_speed_gains(gains);
            NavResponse::Success
        },
        NavRequest::SetSteerGains(gains) => {
            nav.set_steer_gains(gains);
            NavResponse::Success
        },
        NavRequest::SetTargetSpeed { kmh } => {
            nav.set_target_speed(kmh);
            NavResponse::Success
        },
        NavRequest::SetTargetHeading { deg } => {
            nav.set_target_heading(deg);
            NavResponse::Success
        },
        NavRequest::GetStatus => NavResponse::Status(nav.status()),
        NavRequest::Shutdown => NavResponse::Success,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::nav::{MoveCommand, PlayerPos, PoseReport};
    use nalgebra::Vector3;

    use crate::nav::Params;

    #[test]
    fn test_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = PoseLog::open(dir.path().join("rddf.csv"), 10).unwrap();
        let nav = Navigation::new(Params::default(), vec![Vector3::new(1000.0, 0.0, 0.0)])
            .unwrap();

        let report = PoseReport {
            player_pos: Some(PlayerPos { x: 1.0, z: 2.0, y: 0.0 }),
            player_speed: 3.0,
            player_body_x: 0.0,
        };
        assert_eq!(
            dispatch(&nav, Some(&mut log), NavRequest::Info(report), 0.1),
            NavResponse::Success
        );
        assert_eq!(log.records().count(), 1);

        dispatch(&nav, None, NavRequest::SetDestination { x: 100.0, y: 100.0, z: 0.0 }, 0.1);
        dispatch(&nav, None, NavRequest::SetTargetSpeed { kmh: 10.8 }, 0.1);

        match dispatch(&nav, None, NavRequest::GetMove, 0.1) {
            NavResponse::Move(cmd) => assert_eq!(cmd.command, MoveCommand::Move),
            r => panic!("Unexpected response {:?}", r)
        }

        match dispatch(&nav, None, NavRequest::GetStatus, 0.1) {
            NavResponse::Status(s) => {
                assert_eq!(s.position, PlayerPos { x: 1.0, z: 2.0, y: 0.0 });
                assert_eq!(s.destination, Some([100.0, 100.0, 0.0]));
                assert_eq!(s.target_speed_kmh, 10.8);
            },
            r => panic!("Unexpected response {:?}", r)
        }
    }

    #[test]
    fn test_server_over_inproc() {
        let ctx = zmq::Context::new();
        let params = NetParams {
            nav_endpoint: "inproc://nav_server_test".into(),
            nav_bind_endpoint: "inproc://nav_server_test".into(),
        };

        let mut server = NavServer::new(&ctx, &params).unwrap();
        let client = create_socket(
            &ctx,
            zmq::REQ,
            SocketOptions { recv_timeout: 1000, linger: 0, ..Default::default() },
            &params.nav_endpoint
        ).unwrap();

        // Nothing sent yet
        assert!(matches!(server.get_request(), Ok(None)));

        client.send(r#"{"SetTargetSpeed": {"kmh": 20.0}}"#, 0).unwrap();
        let req = server.get_request().unwrap().unwrap();
        assert_eq!(req, NavRequest::SetTargetSpeed { kmh: 20.0 });
        server.send_response(&NavResponse::Success).unwrap();
        assert_eq!(client.recv_string(0).unwrap().unwrap(), r#""Success""#);

        client.send("not json", 0).unwrap();
        assert!(matches!(server.get_request(), Err(NavServerError::InvalidRequest(_))));
        server.send_response(&NavResponse::Error("bad request".into())).unwrap();
        let resp: NavResponse = serde_json::from_str(
            &client.recv_string(0).unwrap().unwrap()
        ).unwrap();
        assert_eq!(resp, NavResponse::Error("bad request".into()));
    }

    #[test]
    fn test_socket_failure_is_not_a_timeout() {
        let ctx = zmq::Context::new();
        let params = NetParams {
            nav_endpoint: "inproc://nav_server_fail_test".into(),
            nav_bind_endpoint: "inproc://nav_server_fail_test".into(),
        };

        let mut server = NavServer::new(&ctx, &params).unwrap();
        let client = create_socket(
            &ctx,
            zmq::REQ,
            SocketOptions { recv_timeout: 1000, linger: 0, ..Default::default() },
            &params.nav_endpoint
        ).unwrap();

        client.send(r#""GetStatus""#, 0).unwrap();
        assert_eq!(server.get_request().unwrap(), Some(NavRequest::GetStatus));

        // Receiving again without replying breaks the REP state machine
        assert!(matches!(
            server.get_request(),
            Err(NavServerError::RecvError(zmq::Error::EFSM))
        ));
    }
}
