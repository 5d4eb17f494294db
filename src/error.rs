//! Unified error types for the TDS meter firmware.
//!
//! The taxonomy is deliberately small: a device that never came up at
//! boot, a configuration that failed validation, and an output sink that
//! refused a write.  Sensor noise is never an error; the robust estimator
//! absorbs it.  All variants are `Copy` so they can be handed to the
//! event sink and the startup path without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A device failed to initialise at startup.
    Init(InitError),
    /// Configuration is invalid.
    Config(&'static str),
    /// An output sink rejected a write.
    Sink(SinkError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Sink(e) => write!(f, "sink: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Startup errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The display never acknowledged initialisation.
    DisplayNotReady { attempts: u32 },
    /// A measurement cycle was requested before startup completed.
    NotStarted,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisplayNotReady { attempts } => {
                write!(f, "display not ready after {attempts} attempt(s)")
            }
            Self::NotStarted => write!(f, "startup has not completed"),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Output sink errors
// ---------------------------------------------------------------------------

/// Failure of a single output sink.  Never fatal: the presenter logs it
/// and moves on to the next sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// The bus transfer (I2C, RMT) failed.
    Bus,
    /// The sink was written before it was initialised.
    NotInitialized,
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "bus transfer failed"),
            Self::NotInitialized => write!(f, "not initialised"),
        }
    }
}

impl From<SinkError> for Error {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
