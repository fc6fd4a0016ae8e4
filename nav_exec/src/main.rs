//! # Navigation Executable
//!
//! This executable closes the control loop of the simulated vehicle:
//! - Pose reports from the simulator are ingested and logged
//! - The background navigation loop keeps the path and tracking error up to date
//! - Move requests from the simulator are answered with speed and heading commands
//! - Operator requests tune the controllers and set the destination and targets

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use comms_if::{
    nav::{NavRequest, NavResponse},
    net::{zmq, NetParams},
};
use log::{info, warn};
use color_eyre::{Result, eyre::WrapErr};

// Internal
use nav_lib::{
    nav::{self, Navigation},
    nav_server::{self, NavServer, NavServerError},
    params::NavExecParams,
    pose_log::PoseLog,
    ref_map,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "nav_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let exec_params: NavExecParams = util::params::load("nav_exec.toml")
        .wrap_err("Could not load the executable parameters")?;
    let nav_params: nav::Params = util::params::load("nav.toml")
        .wrap_err("Could not load the navigation parameters")?;
    let net_params: NetParams = util::params::load("net.toml")
        .wrap_err("Could not load the network parameters")?;

    info!("Parameters loaded");

    // ---- DATA INITIALISATION ----

    let sw_root = host::get_sw_root()
        .wrap_err("Could not find the software root")?;

    let ref_points = ref_map::load_or_fallback(sw_root.join(&exec_params.ref_map_path));

    // The executable can run without its pose log
    let mut pose_log = match PoseLog::open(
        sw_root.join(&exec_params.pose_log_path),
        exec_params.pose_log_max_rows
    ) {
        Ok(l) => {
            info!("Logging poses to {:?}", l.path());
            Some(l)
        },
        Err(e) => {
            warn!("Could not open the pose log, poses will not be logged: {}", e);
            None
        }
    };

    // ---- NAVIGATION INITIALISATION ----

    let mut navigation = Navigation::new(nav_params, ref_points)
        .wrap_err("Failed to initialise navigation")?;
    navigation.start()
        .wrap_err("Failed to start the navigation loop")?;

    // ---- SERVER INITIALISATION ----

    let zmq_ctx = zmq::Context::new();

    let mut server = NavServer::new(&zmq_ctx, &net_params)
        .wrap_err("Failed to initialise server")?;

    info!("Server listening on {}", net_params.nav_bind_endpoint);

    // ---- MAIN LOOP ----

    info!("Initialisation complete, entering main loop");

    loop {
        let request = match server.get_request() {
            Ok(Some(r)) => r,
            Ok(None) => continue,
            Err(NavServerError::InvalidRequest(e)) => {
                warn!("Could not deserialize request: {}", e);
                if let Err(e) = server.send_response(&NavResponse::Error(e.to_string())) {
                    warn!("Couldn't send response to client: {}", e);
                }
                continue
            },
            Err(e) => {
                navigation.shutdown();
                return Err(e).wrap_err("Navigation server failed")
            }
        };

        let shutdown = request == NavRequest::Shutdown;

        let response = nav_server::dispatch(
            &navigation,
            pose_log.as_mut(),
            request,
            exec_params.get_move_dt_s
        );

        if let Err(e) = server.send_response(&response) {
            warn!("Couldn't send response to client: {}", e);
        }

        if shutdown {
            info!("Shutdown requested");
            break
        }
    }

    navigation.shutdown();

    info!("End of execution");

    Ok(())
}
