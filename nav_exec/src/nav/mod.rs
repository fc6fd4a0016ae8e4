//! # Navigation module
//!
//! Navigation owns the shared [`VehicleState`] and the background loop which keeps the path and
//! tracking error fresh. It exposes the operations used by the request handlers: pose ingestion,
//! the per-cycle move computation and the operator's tuning commands.
//!
//! The loop runs on its own thread. Each tick it plans the path to the destination and evaluates
//! the tracking error against the reference trajectory, then sleeps for the rest of the tick
//! period. Move requests run the speed and steering plans on the caller's thread, so both sides
//! take the state lock once per operation and never across any I/O. Nothing logs while the lock
//! is held: the planning steps return what happened and are logged after the lock is released.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod loc_eval;
pub mod params;
pub mod path_planner;
pub mod pos_handler;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, atomic::{AtomicBool, Ordering}};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use log::{debug, error, info, trace, warn};
use nalgebra::Vector3;

// Internal
use comms_if::nav::{MoveCmd, MoveCommand, NavStatus, PidGains, PoseReport};
use util::maths::wrap_deg_180;
use crate::ctrl::PlanStep;
use crate::state::{Destination, VehicleState};
use loc_eval::LocEval;

pub use params::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The navigation system.
pub struct Navigation {
    state: Arc<Mutex<VehicleState>>,

    nav_state: NavState,

    /// Run flag of the current background thread
    bg_run: Option<Arc<AtomicBool>>,

    bg_jh: Option<JoinHandle<()>>,

    tick_period: Duration,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Lifecycle of the background navigation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Created but never started
    Stopped,

    /// The loop is ticking
    Running,

    /// The loop has been shut down
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Could not spawn the navigation thread: {0}")]
    SpawnError(std::io::Error),

    #[error("Invalid tick period: {0} s")]
    InvalidTickPeriod(f64),
}

/// Result of a move computation, logged once the state lock has been released.
struct MoveOutcome {
    loc: LocEval,
    speed: PlanStep,
    steer: PlanStep,
    kind: MoveKind,
}

enum MoveKind {
    Arrived,
    Move(MoveCmd, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Navigation {

    /// Create a new navigation system tracking the given reference points, `(x, z, y)`.
    ///
    /// The background loop is not started.
    pub fn new(params: Params, ref_points: Vec<Vector3<f64>>) -> Result<Self, NavError> {
        if !(params.tick_period_s.is_finite() && params.tick_period_s > 0f64) {
            return Err(NavError::InvalidTickPeriod(params.tick_period_s));
        }

        info!(
            "Navigation created with {} reference points, tick period {} s",
            ref_points.len(), params.tick_period_s
        );

        Ok(Self {
            state: Arc::new(Mutex::new(VehicleState::new(params, ref_points))),
            nav_state: NavState::Stopped,
            bg_run: None,
            bg_jh: None,
            tick_period: Duration::from_secs_f64(params.tick_period_s),
        })
    }

    /// Start the background loop. Starting a running loop does nothing.
    pub fn start(&mut self) -> Result<(), NavError> {
        if self.nav_state == NavState::Running {
            warn!("Navigation loop is already running");
            return Ok(());
        }

        // Each thread gets its own flag so that a restart can't revive an old thread
        let run = Arc::new(AtomicBool::new(true));
        let bg_run = run.clone();
        let bg_state = self.state.clone();
        let period = self.tick_period;

        let jh = thread::Builder::new()
            .name("nav_loop".into())
            .spawn(move || bg_thread(bg_state, bg_run, period))
            .map_err(NavError::SpawnError)?;

        self.bg_run = Some(run);
        self.bg_jh = Some(jh);
        self.nav_state = NavState::Running;

        info!("Navigation loop started");

        Ok(())
    }

    /// Stop the background loop, waiting for the current tick to finish.
    pub fn shutdown(&mut self) {
        if let Some(run) = self.bg_run.take() {
            run.store(false, Ordering::Relaxed);
        }

        if let Some(jh) = self.bg_jh.take() {
            if jh.join().is_err() {
                error!("Navigation thread panicked");
            }
        }

        if self.nav_state == NavState::Running {
            info!("Navigation loop shut down");
        }
        self.nav_state = NavState::Shutdown;
    }

    pub fn nav_state(&self) -> NavState {
        self.nav_state
    }

    /// Compute the motion command for the next `dt` seconds.
    ///
    /// The staged position is applied, the tracking error evaluated and both plans advanced.
    /// Once a destination is set and the vehicle is within the arrival tolerance of the
    /// reference trajectory the targets and controllers are reset and `STOP` is returned.
    pub fn get_move(&self, dt: f64) -> MoveCmd {
        let outcome = {
            let mut state = self.lock();

            state.update_position();
            let loc = state.evaluate_loc();

            let speed = state.plan_speed(dt);
            let steer = state.plan_steering(dt);

            let kind = if state.destination.is_some()
                && state.tracking_error < state.params.arrival_tolerance
            {
                state.target_speed_kmh = 0f64;
                state.current_speed_ms = 0f64;
                state.target_heading_deg = 0f64;
                state.current_heading_deg = 0f64;
                state.reset_speed_plan();
                state.reset_steering_plan();

                MoveKind::Arrived
            }
            else {
                let command = if state.current_speed_ms.abs() < state.params.stop_speed_threshold_ms {
                    MoveCommand::Stop
                }
                else {
                    MoveCommand::Move
                };

                let cmd = MoveCmd { command, speed: speed.value, yaw: steer.value };
                MoveKind::Move(cmd, state.tracking_error)
            };

            MoveOutcome { loc, speed, steer, kind }
        };

        outcome.loc.log();
        outcome.speed.log("Speed");
        outcome.steer.log("Steering");

        match outcome.kind {
            MoveKind::Arrived => {
                info!("Destination reached, stopping");
                MoveCmd::stop()
            },
            MoveKind::Move(cmd, tracking_error) => {
                debug!(
                    "Move: {:?} speed {:.3} m/s, yaw {:.2} deg, tracking error {:.3}",
                    cmd.command, cmd.speed, cmd.yaw, tracking_error
                );
                cmd
            }
        }
    }

    /// Ingest a pose report from the simulator.
    pub fn report_pose(&self, report: &PoseReport) {
        self.lock().ingest_pose(report);
        trace!("Pose reported: {:?}", report);
    }

    /// Replace the destination, given as (x, y, z).
    pub fn set_destination(&self, x: f64, y: f64, z: f64) {
        self.lock().destination = Some(Destination { x, y, z });
        info!("Destination set to ({}, {}, {})", x, y, z);
    }

    /// Set the target speed in kilometers/hour.
    pub fn set_target_speed(&self, speed_kmh: f64) {
        self.lock().target_speed_kmh = speed_kmh;
        info!("Target speed set to {} km/h", speed_kmh);
    }

    /// Set the target heading in degrees, wrapped into (-180, 180].
    pub fn set_target_heading(&self, heading_deg: f64) {
        let heading_deg = wrap_deg_180(heading_deg);
        self.lock().target_heading_deg = heading_deg;
        info!("Target heading set to {} deg", heading_deg);
    }

    /// Set the gains of the speed controller, used from the next move onwards.
    pub fn set_speed_gains(&self, gains: PidGains) {
        self.lock().speed_gains = gains;
        info!("Speed gains set to {:?}", gains);
    }

    /// Set the gains of the steering controller, used from the next move onwards.
    pub fn set_steer_gains(&self, gains: PidGains) {
        self.lock().steer_gains = gains;
        info!("Steering gains set to {:?}", gains);
    }

    /// A snapshot of the navigation state.
    pub fn status(&self) -> NavStatus {
        let running = self.nav_state == NavState::Running;
        self.lock().status(running)
    }

    /// A copy of the vehicle state.
    pub fn state(&self) -> VehicleState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<VehicleState> {
        lock_state(&self.state)
    }
}

impl Drop for Navigation {
    fn drop(&mut self) {
        // The thread is left to exit on its next tick, only shutdown() joins it
        if let Some(run) = self.bg_run.take() {
            run.store(false, Ordering::Relaxed);
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Background thread, refreshes the path and tracking error once per tick until told to stop.
fn bg_thread(state: Arc<Mutex<VehicleState>>, run: Arc<AtomicBool>, period: Duration) {
    while run.load(Ordering::Relaxed) {
        let tick_start = Instant::now();

        let (path, loc) = {
            let mut state = lock_state(&state);
            (state.calc_path(), state.evaluate_loc())
        };

        path.log();
        loc.log();

        // Sleep for the rest of the tick
        match period.checked_sub(tick_start.elapsed()) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Navigation tick overran by {:.6} s",
                (tick_start.elapsed() - period).as_secs_f64()
            )
        }
    }

    debug!("Navigation thread exiting");
}

/// Lock the state, recovering it if another thread panicked while holding the lock.
fn lock_state(state: &Mutex<VehicleState>) -> MutexGuard<VehicleState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
