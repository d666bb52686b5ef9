//! Edge case tests for windows, metrics, the alert machine and gaps in input


use chrono::Local;
use seizure_guard::{
    alert_state::{AlertMachine, AlertSettings, AlertState},
    landmarks::{JointId, LandmarkFrame},
    motion_analyzer::{FrameMetrics, MotionAnalyzer, ShakeCriteria},
    window::{SlidingWindow, WindowSet},
};
use std::collections::BTreeMap;
use test_helpers::{recording_engine, scenario_config, shaking_frame, upper_body};

fn metrics(osc: f64, amp: f64) -> FrameMetrics {
    FrameMetrics {
        joints: BTreeMap::new(),
        avg_oscillation: osc,
        avg_amplitude: amp,
    }
}

fn reference_settings() -> AlertSettings {
    AlertSettings {
        criteria: ShakeCriteria {
            min_oscillations: 0.75,
            min_amplitude: 6.0,
        },
        confirmation_frames: 15,
        decay_step: 2,
        hold_frames: 45,
    }
}

#[test]
fn test_window_eviction_keeps_last_capacity() {
    for capacity in [1, 2, 5, 15] {
        for extra in [1, 3, 20] {
            let mut window = SlidingWindow::new(capacity);
            let total = capacity + extra;
            for i in 0..total {
                window.push(i as f64);
            }
            let expected: Vec<f64> = (extra..total).map(|i| i as f64).collect();
            assert_eq!(window.snapshot(), expected, "capacity {capacity}, extra {extra}");
            assert!(window.is_full());
        }
    }
}

#[test]
fn test_extreme_values_do_not_corrupt_windows() {
    let mut window = SlidingWindow::new(3);
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300, -1e300, 0.0] {
        window.push(value);
    }
    assert_eq!(window.snapshot(), vec![1e300, -1e300, 0.0]);
    assert!(window.snapshot().iter().all(|v| v.is_finite()));
}

#[test]
fn test_non_finite_frame_treated_as_gap() {
    let joints = upper_body();
    let mut set = WindowSet::new(&joints, 4);
    let frame = LandmarkFrame::uniform(&joints, f64::NAN).with(JointId::Nose, 10.0);
    assert_eq!(set.update(&frame), 1);
    assert_eq!(set.get(JointId::LeftShoulder).map(SlidingWindow::len), Some(0));
}

#[test]
fn test_metrics_identical_across_calls() {
    let joints = upper_body();
    let analyzer = MotionAnalyzer::new(joints.clone(), 15);
    let mut set = WindowSet::new(&joints, 15);
    for i in 0..15 {
        set.update(&shaking_frame(&joints, i));
    }
    let snapshot = set.snapshot();

    let first = analyzer.compute_metrics(&snapshot).unwrap();
    for _ in 0..10 {
        assert_eq!(analyzer.compute_metrics(&snapshot).unwrap(), first);
    }
    assert!((first.avg_amplitude - 12.0).abs() < 1e-9);
    assert!(first.avg_oscillation >= 2.0);
}

#[test]
fn test_counter_stays_in_bounds_for_long_sequences() {
    let settings = reference_settings();
    let now = Local::now();
    let mut machine = AlertMachine::new();

    // Deterministic pseudo-random shaking pattern
    let mut seed: u32 = 12345;
    for _ in 0..5000 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
        let shaking = (seed >> 16) % 3 != 0;
        let frame_metrics = if shaking { metrics(3.0, 20.0) } else { metrics(0.0, 1.0) };
        machine.step(&settings, Some(&frame_metrics), now);
        assert!(machine.counter() <= settings.confirmation_frames);
    }
}

#[test]
fn test_flicker_five_on_five_off_stays_idle() {
    let settings = reference_settings();
    let now = Local::now();
    let mut machine = AlertMachine::new();

    for _ in 0..100 {
        for _ in 0..5 {
            assert!(machine.step(&settings, Some(&metrics(3.0, 20.0)), now).is_none());
        }
        for _ in 0..5 {
            assert!(machine.step(&settings, Some(&metrics(0.0, 0.0)), now).is_none());
        }
        assert_eq!(machine.state(), AlertState::Idle);
    }
}

#[test]
fn test_amplitude_without_oscillation_is_not_shaking() {
    let settings = reference_settings();
    let now = Local::now();
    let mut machine = AlertMachine::new();
    for _ in 0..50 {
        machine.step(&settings, Some(&metrics(0.5, 50.0)), now);
    }
    assert_eq!(machine.state(), AlertState::Idle);
}

#[test]
fn test_landmarks_lost_holds_engine_idle() {
    let (mut engine, dispatcher) = recording_engine(&scenario_config()).unwrap();
    for _ in 0..200 {
        let report = engine.process_frame(&LandmarkFrame::new());
        assert!(report.metrics.is_none());
        assert_eq!(report.state, AlertState::Idle);
    }
    let status = engine.status();
    assert!(!status.seizure_detected);
    assert_eq!(status.debug_shakes, 0.0);
    assert_eq!(status.debug_energy, 0.0);
    assert_eq!(dispatcher.calls(), 0);
}

#[test]
fn test_gaps_do_not_reset_windows() {
    let (mut engine, _dispatcher) = recording_engine(&scenario_config()).unwrap();
    let joints = upper_body();

    for i in 0..14 {
        engine.process_frame(&shaking_frame(&joints, i));
        engine.process_frame(&LandmarkFrame::new());
    }
    // The fifteenth real sample completes every window despite the gaps
    let report = engine.process_frame(&shaking_frame(&joints, 14));
    assert!(report.metrics.is_some());
}

#[test]
fn test_one_missing_joint_blocks_metrics() {
    let (mut engine, _dispatcher) = recording_engine(&scenario_config()).unwrap();
    for i in 0..30 {
        let x = if i % 2 == 0 { 100.0 } else { 112.0 };
        let frame = LandmarkFrame::new().with(JointId::Nose, x).with(JointId::LeftShoulder, x);
        let report = engine.process_frame(&frame);
        assert!(report.metrics.is_none());
    }
    assert_eq!(engine.state(), AlertState::Idle);
}
