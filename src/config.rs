//! Meter configuration
//!
//! Everything that differs between deployments — batch size, sampling
//! cadence, estimator, band table, startup retry policy — is data in one
//! [`MeterConfig`] record, fixed at build time and validated once at boot.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::ports::VoltageSource;
use crate::drivers::led_patterns::{COLOUR_GREEN, COLOUR_RED, COLOUR_YELLOW};
use crate::pins;
use crate::pipeline::classifier::{BandTable, QualityBand};
use crate::pipeline::estimator::EstimatorStrategy;
use crate::pipeline::sampler::{MAX_BATCH_SIZE, SampleCadence};
use crate::sensors::tds::adc1_channel_for_gpio;

/// What to do when the display does not acknowledge at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartupRetryPolicy {
    /// Try up to `attempts` times, then halt with the failure blink.
    Bounded { attempts: u32, retry_delay_ms: u32 },
    /// Keep trying until the display comes up.
    Unbounded { retry_delay_ms: u32 },
}

/// Probe wiring and compensation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSettings {
    pub adc_gpio: i32,
    /// ADC reference voltage (V).
    pub reference_voltage: f32,
    /// ADC full-scale count.
    pub adc_range: u32,
    /// Assumed water temperature for compensation (°C).
    pub water_temperature_c: f32,
    /// Probe cell-constant correction.
    pub k_value: f32,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            adc_gpio: pins::TDS_ADC_GPIO,
            reference_voltage: pins::TDS_ADC_VREF,
            adc_range: pins::TDS_ADC_RANGE,
            water_temperature_c: 20.0,
            k_value: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub i2c_address: u8,
    pub voltage_source: VoltageSource,
    /// Wait before the first bring-up attempt so the supply settles.
    pub settle_ms: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            i2c_address: pins::OLED_I2C_ADDR,
            voltage_source: VoltageSource::SwitchCapVcc,
            settle_ms: 1000,
        }
    }
}

/// Core meter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterConfig {
    // --- Sampling ---
    /// Readings per measurement cycle (1..=MAX_BATCH_SIZE)
    pub batch_size: usize,
    pub cadence: SampleCadence,

    // --- Estimation / classification ---
    pub estimator: EstimatorStrategy,
    pub bands: BandTable,

    // --- Devices ---
    pub startup_retry: StartupRetryPolicy,
    pub sensor: SensorSettings,
    pub display: DisplaySettings,
    /// NeoPixel global brightness (1-255)
    pub led_brightness: u8,

    // --- Timing ---
    /// Pause after each presented value (milliseconds)
    pub cycle_pause_ms: u32,
}

impl MeterConfig {
    /// Fast-updating meter: 2750 back-to-back reads, mean of the 200
    /// values around the median, halt and blink if the display is absent.
    pub fn continuous_trimmed() -> Self {
        Self {
            batch_size: 2750,
            cadence: SampleCadence::Continuous,
            estimator: EstimatorStrategy::TrimmedMean { half_width: 100 },
            // < 6 ppm is nearly demineralised; < 300 is "excellent" drinking water.
            bands: BandTable::new(QualityBand::new("high", COLOUR_RED))
                .with_band(6.0, QualityBand::new("very low", COLOUR_YELLOW))
                .with_band(300.0, QualityBand::new("excellent", COLOUR_GREEN)),
            startup_retry: StartupRetryPolicy::Bounded {
                attempts: 1,
                retry_delay_ms: 0,
            },
            sensor: SensorSettings::default(),
            display: DisplaySettings::default(),
            led_brightness: 10,
            cycle_pause_ms: 0,
        }
    }

    /// Filter-pitcher monitor: 40 reads 10 ms apart, plain median,
    /// retry the display forever.
    pub fn discrete_median() -> Self {
        Self {
            batch_size: 40,
            cadence: SampleCadence::FixedDelay { delay_ms: 10 },
            estimator: EstimatorStrategy::Median,
            // Filter makers suggest replacing the cartridge at 6 ppm.
            bands: BandTable::new(QualityBand::new("replace filter", COLOUR_RED))
                .with_band(1.0, QualityBand::new("pure", COLOUR_GREEN))
                .with_band(6.0, QualityBand::new("below replace threshold", COLOUR_YELLOW)),
            startup_retry: StartupRetryPolicy::Unbounded { retry_delay_ms: 500 },
            sensor: SensorSettings::default(),
            display: DisplaySettings::default(),
            led_brightness: 10,
            cycle_pause_ms: 0,
        }
    }

    /// Configuration baked in at build time.
    ///
    /// `TDSMETER_CONFIG` (a JSON document) wins over `TDSMETER_PROFILE`
    /// (`continuous` | `discrete`); with neither set the default applies.
    pub fn compiled_in() -> Result<Self, ConfigError> {
        let config = match (option_env!("TDSMETER_CONFIG"), option_env!("TDSMETER_PROFILE")) {
            (Some(json), _) => Self::from_json(json)?,
            (None, Some(profile)) => Self::from_profile(profile)?,
            (None, None) => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_profile(name: &str) -> Result<Self, ConfigError> {
        match name {
            "continuous" => Ok(Self::continuous_trimmed()),
            "discrete" => Ok(Self::discrete_median()),
            _ => Err(ConfigError::UnknownProfile),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|_| ConfigError::Malformed)
    }

    /// Range checks.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::ValidationFailed("batch_size out of range"));
        }
        if let EstimatorStrategy::TrimmedMean { half_width } = self.estimator {
            if half_width.saturating_mul(2) > self.batch_size {
                return Err(ConfigError::ValidationFailed(
                    "trimmed-mean window wider than batch",
                ));
            }
        }
        self.bands.validate().map_err(ConfigError::ValidationFailed)?;
        if let StartupRetryPolicy::Bounded { attempts: 0, .. } = self.startup_retry {
            return Err(ConfigError::ValidationFailed("bounded retry needs at least one attempt"));
        }
        if self.led_brightness == 0 {
            return Err(ConfigError::ValidationFailed("led_brightness must be non-zero"));
        }
        if adc1_channel_for_gpio(self.sensor.adc_gpio).is_none() {
            return Err(ConfigError::ValidationFailed("adc_gpio is not an ADC1 pin"));
        }
        let vref = self.sensor.reference_voltage;
        if self.sensor.adc_range == 0 || vref.is_nan() || vref <= 0.0 {
            return Err(ConfigError::ValidationFailed("ADC scaling must be positive"));
        }
        Ok(())
    }
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self::continuous_trimmed()
    }
}

/// Errors from building or validating a [`MeterConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document did not parse into a config.
    Malformed,
    /// `TDSMETER_PROFILE` names no known preset.
    UnknownProfile,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config document malformed"),
            Self::UnknownProfile => write!(f, "unknown config profile"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Self::Config("config document malformed"),
            ConfigError::UnknownProfile => Self::Config("unknown config profile"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
