//! Gravity analog TDS probe driver.
//!
//! Reads the probe board's analog output through an ESP32-S3 ADC1
//! channel, converts voltage to electrical conductivity with the probe's
//! cubic fit, compensates to 25 °C, and scales conductivity to total
//! dissolved solids (ppm).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API; `begin` configures the
//! channel for the selected GPIO on the unit hw_init created.
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::pins;

#[cfg(not(target_os = "espidf"))]
static SIM_TDS_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_tds_adc(raw: u16) {
    SIM_TDS_ADC.store(raw, Ordering::Relaxed);
}

/// Conductivity → TDS conversion factor.
const TDS_FACTOR: f32 = 0.5;
/// Conductivity temperature coefficient (per °C, referenced to 25 °C).
const TEMP_COEFF: f32 = 0.02;
/// Cubic fit of conductivity (µS/cm) against probe voltage.
const EC_CUBIC: (f32, f32, f32) = (133.42, -255.86, 857.39);

#[derive(Debug, Clone, Copy)]
pub struct TdsReading {
    pub raw: u16,
    pub voltage: f32,
    pub ppm: f32,
}

pub struct TdsSensor {
    adc_gpio: i32,
    adc_channel: u32,
    reference_voltage: f32,
    adc_range: u32,
    temperature_c: f32,
    /// Cell constant correction; 1.0 is an uncalibrated probe.
    k_value: f32,
    started: bool,
    last: TdsReading,
}

impl Default for TdsSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl TdsSensor {
    pub fn new() -> Self {
        Self {
            adc_gpio: pins::TDS_ADC_GPIO,
            adc_channel: pins::TDS_ADC_CHANNEL,
            reference_voltage: pins::TDS_ADC_VREF,
            adc_range: pins::TDS_ADC_RANGE,
            temperature_c: 25.0,
            k_value: 1.0,
            started: false,
            last: TdsReading {
                raw: 0,
                voltage: 0.0,
                ppm: 0.0,
            },
        }
    }

    pub fn configure(&mut self, adc_gpio: i32, reference_voltage: f32, adc_range: u32) {
        match adc1_channel_for_gpio(adc_gpio) {
            Some(channel) => {
                self.adc_gpio = adc_gpio;
                self.adc_channel = channel;
            }
            None => log::warn!(
                "TDS: GPIO {} has no ADC1 channel, keeping GPIO {}",
                adc_gpio,
                self.adc_gpio
            ),
        }
        self.reference_voltage = reference_voltage;
        self.adc_range = adc_range.max(1);
    }

    /// Configure the ADC channel and start converting.  If the channel
    /// cannot be configured the probe stays idle and reads keep
    /// returning the last value.
    pub fn begin(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if let Err(e) = hw_init::adc1_config_channel(self.adc_channel) {
                log::error!("TDS: GPIO {} channel setup failed: {}", self.adc_gpio, e);
                return;
            }
        }
        self.started = true;
        log::info!(
            "TDS: probe on GPIO {} (ADC1 CH{}), aref={}V range={}",
            self.adc_gpio,
            self.adc_channel,
            self.reference_voltage,
            self.adc_range
        );
    }

    pub fn set_temperature(&mut self, celsius: f32) {
        self.temperature_c = celsius;
    }

    pub fn set_k_value(&mut self, k_value: f32) {
        self.k_value = k_value;
    }

    /// Take one conversion.  Before [`begin`](Self::begin) the last
    /// reading is left unchanged.
    pub fn read(&mut self) -> TdsReading {
        if self.started {
            let raw = self.read_adc();
            let voltage = f32::from(raw) / self.adc_range as f32 * self.reference_voltage;
            let ppm = self.voltage_to_ppm(voltage);
            self.last = TdsReading { raw, voltage, ppm };
        }
        self.last
    }

    pub fn last(&self) -> TdsReading {
        self.last
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_TDS_ADC.load(Ordering::Relaxed)
    }

    fn voltage_to_ppm(&self, v: f32) -> f32 {
        let (a, b, c) = EC_CUBIC;
        let ec = (a * v * v * v + b * v * v + c * v) * self.k_value;
        let ec25 = ec / (1.0 + TEMP_COEFF * (self.temperature_c - 25.0));
        ec25 * TDS_FACTOR
    }
}

/// ESP32-S3 ADC1 covers GPIO 1–10 as channels 0–9.
pub fn adc1_channel_for_gpio(gpio: i32) -> Option<u32> {
    (1..=10).contains(&gpio).then(|| (gpio - 1) as u32)
}
