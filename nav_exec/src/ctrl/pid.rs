//! # PID controller
//!
//! A discrete PID controller whose gains and time step are supplied before each evaluation. The
//! controller can operate on plain linear errors or on angular errors in degrees, in which case
//! the error is wrapped onto the shortest way round the circle before use.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error};
use serde::Serialize;

// Internal
use comms_if::nav::PidGains;
use util::maths::wrap_deg_180;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The result of one controller evaluation.
///
/// Evaluations happen while the vehicle state is locked, so the controller doesn't log. The step
/// carries everything needed to log it once the lock has been released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidStep {
    /// Controller output, zero if the evaluation faulted
    pub output: f64,

    pub error: f64,
    pub integral: f64,
    pub derivative: f64,

    pub fault: Option<PidFault>,
}

/// A PID controller
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Time step used by the integral and derivative terms
    dt: f64,

    /// The integral accumulation
    integral: f64,

    /// Previous error
    prev_error: f64,

    /// How the error is formed from the setpoint and measurement
    norm: ErrorNorm,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A numeric fault detected during an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PidFault {
    /// The error between the setpoint and measurement is not finite
    NonFiniteError { setpoint: f64, measured: f64 },

    /// The combined output is not finite
    NonFiniteOutput,
}

/// The way a controller turns a setpoint and measurement into an error.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorNorm {
    /// `setpoint - measured`
    Linear,

    /// `setpoint - measured` wrapped into (-180, 180] degrees
    Angular,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given gains and time step.
    pub fn new(gains: PidGains, dt: f64, norm: ErrorNorm) -> Self {
        Self {
            k_p: gains.kp,
            k_i: gains.ki,
            k_d: gains.kd,
            dt,
            integral: 0f64,
            prev_error: 0f64,
            norm
        }
    }

    /// Create a new controller operating on linear errors.
    pub fn linear(gains: PidGains, dt: f64) -> Self {
        Self::new(gains, dt, ErrorNorm::Linear)
    }

    /// Create a new controller operating on angular errors in degrees.
    pub fn angular(gains: PidGains, dt: f64) -> Self {
        Self::new(gains, dt, ErrorNorm::Angular)
    }

    /// Set the gains and time step used by the next call to [`PidController::compute`].
    ///
    /// The accumulated integral and previous error are kept.
    pub fn update_gains(&mut self, gains: PidGains, dt: f64) {
        self.k_p = gains.kp;
        self.k_i = gains.ki;
        self.k_d = gains.kd;
        self.dt = dt;
    }

    /// Compute the controller output for the given setpoint and measurement.
    ///
    /// If the error or output is not a finite number the step carries the fault and an output of
    /// `0.0`. A non-finite error leaves the controller state untouched.
    pub fn compute(&mut self, setpoint: f64, measured: f64) -> PidStep {
        let error = self.norm.error(setpoint, measured);

        if !error.is_finite() {
            return PidStep {
                output: 0f64,
                error,
                integral: self.integral,
                derivative: 0f64,
                fault: Some(PidFault::NonFiniteError { setpoint, measured }),
            };
        }

        // Accumulate the integral term
        self.integral += error * self.dt;

        // A zero time step has no meaningful derivative
        let deriv = if self.dt > 0f64 {
            (error - self.prev_error) / self.dt
        }
        else {
            0f64
        };

        let out =
            self.k_p * error
            + self.k_i * self.integral
            + self.k_d * deriv;

        self.prev_error = error;

        let (output, fault) = match out.is_finite() {
            true => (out, None),
            false => (0f64, Some(PidFault::NonFiniteOutput))
        };

        PidStep {
            output,
            error,
            integral: self.integral,
            derivative: deriv,
            fault,
        }
    }

    /// Clear the integral accumulation and previous error.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = 0f64;
    }

    /// The current gains of the controller.
    pub fn gains(&self) -> PidGains {
        PidGains {
            kp: self.k_p,
            ki: self.k_i,
            kd: self.k_d
        }
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}

impl PidStep {
    /// Log the step, faults at error level and everything else at debug.
    pub fn log(&self, name: &str) {
        match self.fault {
            Some(PidFault::NonFiniteError { setpoint, measured }) => error!(
                "{} PID error is not finite (setpoint: {}, measured: {}), output forced to zero",
                name, setpoint, measured
            ),
            Some(PidFault::NonFiniteOutput) => error!(
                "{} PID output is not finite (error: {}, integral: {}, derivative: {}), output \
                forced to zero",
                name, self.error, self.integral, self.derivative
            ),
            None => debug!(
                "{} PID: error = {:.4}, integral = {:.4}, derivative = {:.4}, output = {:.4}",
                name, self.error, self.integral, self.derivative, self.output
            )
        }
    }
}

impl ErrorNorm {
    /// Form the error between the setpoint and measurement.
    pub fn error(&self, setpoint: f64, measured: f64) -> f64 {
        let raw = setpoint - measured;

        match self {
            ErrorNorm::Linear => raw,
            ErrorNorm::Angular => wrap_deg_180(raw)
        }
    }
}
