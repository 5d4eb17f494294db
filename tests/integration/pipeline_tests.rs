//! Integration tests for the MeterService → Sampler → Estimator →
//! Classifier → Presenter pipeline.
//!
//! These run on the host (x86_64) against the mocks in `mock_hw`, with a
//! virtual clock so fixed-delay cadences finish instantly.

use crate::mock_hw::{RecordingSink, devices};

use tdsmeter::app::events::{MeterEvent, SinkKind};
use tdsmeter::app::service::MeterService;
use tdsmeter::config::MeterConfig;
use tdsmeter::drivers::led_patterns::{COLOUR_GREEN, COLOUR_RED, COLOUR_YELLOW};
use tdsmeter::error::{Error, InitError, SinkError};

fn started(config: MeterConfig, values: Vec<f32>) -> (MeterService, crate::mock_hw::MockDevices, RecordingSink) {
    let mut svc = MeterService::new(config).unwrap();
    let mut dev = devices(values);
    let mut sink = RecordingSink::default();
    svc.start(&mut dev, &mut sink).unwrap();
    (svc, dev, sink)
}

// ── Uniform batch, median ─────────────────────────────────────

#[test]
fn uniform_batch_median_lands_in_below_replace_band() {
    let (mut svc, mut dev, mut sink) = started(MeterConfig::discrete_median(), vec![5.0; 40]);

    let report = svc.run_cycle(&mut dev, &mut sink).unwrap();

    assert_eq!(report.estimate, 5.0);
    assert_eq!(report.band.as_str(), "below replace threshold");
    assert_eq!(report.samples, 40);
    assert_eq!(dev.sensor.refreshes, 40);
    assert_eq!(dev.led.last_shown(), Some(COLOUR_YELLOW));
    assert_eq!(dev.display.committed, vec!["005".to_string(), " ppm".to_string()]);
    // 1000 ms settle + 40 × 10 ms inter-sample delay.
    assert_eq!(dev.log.lines, vec!["1400 5.000 ppm".to_string()]);
}

#[test]
fn fixed_delay_cadence_waits_after_every_read() {
    let (mut svc, mut dev, mut sink) = started(MeterConfig::discrete_median(), vec![5.0; 40]);
    dev.time.delays_ms.clear();

    svc.run_cycle(&mut dev, &mut sink).unwrap();

    assert_eq!(dev.time.delays_ms, vec![10; 40]);
}

// ── Ramp batch, trimmed mean ──────────────────────────────────

#[test]
fn descending_ramp_trimmed_mean_is_centre_window_mean() {
    let ramp: Vec<f32> = (0..2750).rev().map(|v| v as f32).collect();
    let (mut svc, mut dev, mut sink) = started(MeterConfig::continuous_trimmed(), ramp);

    let report = svc.run_cycle(&mut dev, &mut sink).unwrap();

    // Mean of sorted indices 1275..1475.
    assert_eq!(report.estimate, 1374.5);
    assert_eq!(report.min, 0.0);
    assert_eq!(report.max, 2749.0);
    assert_eq!(report.band.as_str(), "high");
    assert_eq!(dev.led.last_shown(), Some(COLOUR_RED));
    assert_eq!(dev.display.committed[0], "1375");
    // Continuous cadence: only the boot settle delay elapsed.
    assert_eq!(dev.log.lines, vec!["1000 1374.500 ppm".to_string()]);
}

#[test]
fn spikes_do_not_move_the_median() {
    let mut values = vec![5.0; 40];
    values[3] = 5000.0;
    values[17] = -300.0;
    values[29] = 9000.0;
    let (mut svc, mut dev, mut sink) = started(MeterConfig::discrete_median(), values);

    let report = svc.run_cycle(&mut dev, &mut sink).unwrap();

    assert_eq!(report.estimate, 5.0);
    assert_eq!(report.min, -300.0);
    assert_eq!(report.max, 9000.0);
}

#[test]
fn band_follows_the_water_between_cycles() {
    let mut values = vec![0.5; 40];
    values.extend(std::iter::repeat_n(10.0, 40));
    let (mut svc, mut dev, mut sink) = started(MeterConfig::discrete_median(), values);

    let first = svc.run_cycle(&mut dev, &mut sink).unwrap();
    assert_eq!(first.band.as_str(), "pure");
    assert_eq!(dev.led.last_shown(), Some(COLOUR_GREEN));

    let second = svc.run_cycle(&mut dev, &mut sink).unwrap();
    assert_eq!(second.band.as_str(), "replace filter");
    assert_eq!(dev.led.last_shown(), Some(COLOUR_RED));
    assert_eq!(dev.log.lines.len(), 2);
}

// ── Cycle bookkeeping ─────────────────────────────────────────

#[test]
fn cycles_are_counted_and_reported() {
    let (mut svc, mut dev, mut sink) = started(MeterConfig::discrete_median(), vec![2.0; 40]);

    for expected in 1..=3 {
        let report = svc.run_cycle(&mut dev, &mut sink).unwrap();
        assert_eq!(report.cycle, expected);
    }
    assert_eq!(svc.cycle_count(), 3);
    // One feed per display attempt at startup, then one per cycle.
    assert_eq!(dev.watchdog.feeds, 1 + 3);

    let completed = sink
        .events
        .iter()
        .filter(|e| matches!(e, MeterEvent::CycleCompleted(_)))
        .count();
    assert_eq!(completed, 3);
}

#[test]
fn cycle_pause_applied_after_presenting() {
    let mut config = MeterConfig::discrete_median();
    config.cycle_pause_ms = 250;
    let (mut svc, mut dev, mut sink) = started(config, vec![2.0; 40]);

    svc.run_cycle(&mut dev, &mut sink).unwrap();

    assert_eq!(dev.time.delays_ms.last(), Some(&250));
    assert_eq!(dev.log.lines.len(), 1);
}

#[test]
fn cycle_before_start_is_refused() {
    let mut svc = MeterService::new(MeterConfig::discrete_median()).unwrap();
    let mut dev = devices(vec![5.0]);
    let mut sink = RecordingSink::default();

    let result = svc.run_cycle(&mut dev, &mut sink);

    assert_eq!(result, Err(Error::Init(InitError::NotStarted)));
    assert_eq!(dev.sensor.refreshes, 0);
    assert!(dev.log.lines.is_empty());
}

// ── Sink failure isolation ────────────────────────────────────

#[test]
fn led_failure_does_not_block_display_or_log() {
    let (mut svc, mut dev, mut sink) = started(MeterConfig::discrete_median(), vec![5.0; 40]);
    dev.led.fail_commits = true;

    let report = svc.run_cycle(&mut dev, &mut sink).unwrap();

    assert_eq!(report.estimate, 5.0);
    assert_eq!(dev.display.committed[0], "005");
    assert_eq!(dev.log.lines.len(), 1);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        MeterEvent::SinkFailed {
            sink: SinkKind::Led,
            error: SinkError::Bus
        }
    )));
}

#[test]
fn display_failure_does_not_block_led_or_log() {
    let (mut svc, mut dev, mut sink) = started(MeterConfig::discrete_median(), vec![5.0; 40]);
    dev.display.fail_commits = true;

    svc.run_cycle(&mut dev, &mut sink).unwrap();

    assert_eq!(dev.led.last_shown(), Some(COLOUR_YELLOW));
    assert_eq!(dev.log.lines.len(), 1);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        MeterEvent::SinkFailed {
            sink: SinkKind::Display,
            ..
        }
    )));
    // The cycle itself still completes.
    assert!(matches!(sink.events.last(), Some(MeterEvent::CycleCompleted(_))));
}
