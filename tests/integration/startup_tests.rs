//! Integration tests for boot-time bring-up and the failure indication.

use crate::mock_hw::{MockDisplay, RecordingSink, devices};

use tdsmeter::app::events::MeterEvent;
use tdsmeter::app::service::MeterService;
use tdsmeter::config::{MeterConfig, StartupRetryPolicy};
use tdsmeter::drivers::led_patterns::{
    COLOUR_FAILURE_A, COLOUR_FAILURE_B, COLOUR_STARTUP, FAILURE_DWELL_MS,
};
use tdsmeter::error::{Error, InitError};

#[test]
fn startup_shows_blue_and_prepares_probe() {
    let config = MeterConfig::discrete_median();
    let expected_sensor = config.sensor;
    let mut svc = MeterService::new(config).unwrap();
    let mut dev = devices(vec![5.0]);
    let mut sink = RecordingSink::default();

    svc.start(&mut dev, &mut sink).unwrap();

    assert!(svc.is_started());
    assert_eq!(dev.led.shown.first(), Some(&COLOUR_STARTUP));
    assert_eq!(dev.led.brightness, Some(10));
    assert_eq!(
        dev.sensor.configured,
        Some((
            expected_sensor.adc_gpio,
            expected_sensor.reference_voltage,
            expected_sensor.adc_range
        ))
    );
    assert!(dev.sensor.begun);
    assert_eq!(dev.sensor.temperature, Some(20.0));
    // Startup never samples.
    assert_eq!(dev.sensor.refreshes, 0);
    assert_eq!(dev.time.delays_ms, vec![1000]);
    assert!(matches!(
        sink.events.last(),
        Some(MeterEvent::Started { batch_size: 40 })
    ));
}

#[test]
fn absent_display_under_bounded_policy_halts_with_blink() {
    let mut svc = MeterService::new(MeterConfig::continuous_trimmed()).unwrap();
    let mut dev = devices(vec![5.0]);
    dev.display = MockDisplay::never_ready();
    let mut sink = RecordingSink::default();

    let result = svc.start(&mut dev, &mut sink);

    assert_eq!(
        result,
        Err(Error::Init(InitError::DisplayNotReady { attempts: 1 }))
    );
    assert!(!svc.is_started());
    assert!(matches!(
        sink.events.as_slice(),
        [
            MeterEvent::DisplayAttemptFailed { attempt: 1 },
            MeterEvent::StartupFailed(_)
        ]
    ));

    // What main does from here on.
    svc.signal_failure(&mut dev);
    svc.signal_failure(&mut dev);
    assert_eq!(
        dev.led.shown,
        vec![
            COLOUR_STARTUP,
            COLOUR_FAILURE_A,
            COLOUR_FAILURE_B,
            COLOUR_FAILURE_A,
            COLOUR_FAILURE_B
        ]
    );
    assert!(dev.time.delays_ms.ends_with(&[FAILURE_DWELL_MS; 4]));

    // Measurement never happens.
    assert!(svc.run_cycle(&mut dev, &mut sink).is_err());
    assert_eq!(dev.sensor.refreshes, 0);
    assert!(dev.log.lines.is_empty());
}

#[test]
fn bounded_policy_spaces_attempts_and_gives_up() {
    let mut config = MeterConfig::continuous_trimmed();
    config.startup_retry = StartupRetryPolicy::Bounded {
        attempts: 3,
        retry_delay_ms: 50,
    };
    let mut svc = MeterService::new(config).unwrap();
    let mut dev = devices(vec![5.0]);
    dev.display = MockDisplay::never_ready();
    let mut sink = RecordingSink::default();

    let result = svc.start(&mut dev, &mut sink);

    assert_eq!(
        result,
        Err(Error::Init(InitError::DisplayNotReady { attempts: 3 }))
    );
    assert_eq!(dev.display.init_attempts, 3);
    // Settle, then a gap between attempts but none after the last.
    assert_eq!(dev.time.delays_ms, vec![1000, 50, 50]);
}

#[test]
fn bounded_policy_succeeds_within_budget() {
    let mut config = MeterConfig::continuous_trimmed();
    config.startup_retry = StartupRetryPolicy::Bounded {
        attempts: 3,
        retry_delay_ms: 0,
    };
    let mut svc = MeterService::new(config).unwrap();
    let mut dev = devices(vec![5.0]);
    dev.display = MockDisplay::ready_after(2);
    let mut sink = RecordingSink::default();

    assert!(svc.start(&mut dev, &mut sink).is_ok());
    assert_eq!(dev.display.init_attempts, 3);
}

#[test]
fn unbounded_policy_retries_until_display_answers() {
    let mut svc = MeterService::new(MeterConfig::discrete_median()).unwrap();
    let mut dev = devices(vec![5.0; 40]);
    dev.display = MockDisplay::ready_after(4);
    let mut sink = RecordingSink::default();

    svc.start(&mut dev, &mut sink).unwrap();

    assert_eq!(dev.display.init_attempts, 5);
    assert_eq!(dev.time.delays_ms, vec![1000, 500, 500, 500, 500]);
    let failures = sink
        .events
        .iter()
        .filter(|e| matches!(e, MeterEvent::DisplayAttemptFailed { .. }))
        .count();
    assert_eq!(failures, 4);

    // Fed before every attempt.
    assert_eq!(dev.watchdog.feeds, 5);

    // And the meter runs normally afterwards.
    let report = svc.run_cycle(&mut dev, &mut sink).unwrap();
    assert_eq!(report.estimate, 5.0);
}

#[test]
fn minute_long_unbounded_retry_keeps_watchdog_fed() {
    let mut svc = MeterService::new(MeterConfig::discrete_median()).unwrap();
    let mut dev = devices(vec![5.0; 40]);
    dev.display = MockDisplay::ready_after(120);
    let mut sink = RecordingSink::default();

    svc.start(&mut dev, &mut sink).unwrap();

    // 1 s settle + 120 × 500 ms of retries.
    assert_eq!(dev.time.now_ms, 61_000);
    assert_eq!(dev.display.init_attempts, 121);
    assert_eq!(dev.watchdog.feeds, 121);
}

#[test]
fn failure_blink_feeds_watchdog() {
    let mut svc = MeterService::new(MeterConfig::continuous_trimmed()).unwrap();
    let mut dev = devices(vec![5.0]);
    dev.display = MockDisplay::never_ready();
    let mut sink = RecordingSink::default();
    assert!(svc.start(&mut dev, &mut sink).is_err());
    let after_start = dev.watchdog.feeds;

    for _ in 0..3 {
        svc.signal_failure(&mut dev);
    }

    assert_eq!(dev.watchdog.feeds, after_start + 3);
}
