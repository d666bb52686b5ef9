//! End-to-end detection scenarios driven through the engine


use chrono::Local;
use seizure_guard::{
    alert_state::{AlertSignal, AlertState},
    engine::Engine,
    event_log::EventType,
    landmarks::{JointId, LandmarkFrame, ScriptedLandmarks},
};
use std::time::Duration;
use test_helpers::{
    frame_time, recording_engine, scenario_config, shaking_frame, still_frame, upper_body,
};

/// Feed the reference oscillation until the alert is raised; returns the frame index it fired on
fn drive_to_active(engine: &mut Engine, start: chrono::DateTime<Local>) -> usize {
    let joints = upper_body();
    let mut fired_at = None;

    for i in 0..29 {
        let report = engine.process_frame_at(&shaking_frame(&joints, i), frame_time(start, i));
        if i < 14 {
            assert!(report.metrics.is_none(), "window should still be filling at frame {i}");
        }
        if let Some(AlertSignal::Started { intensity, .. }) = report.signal {
            assert!(fired_at.is_none(), "alert-start fired twice");
            assert!((intensity - 12.0).abs() < 1e-6, "unexpected intensity {intensity}");
            fired_at = Some(i);
        }
    }

    fired_at.expect("alert never started")
}

#[test]
fn test_constant_input_stays_idle() {
    let (mut engine, dispatcher) = recording_engine(&scenario_config()).unwrap();
    let joints = upper_body();

    for _ in 0..60 {
        let report = engine.process_frame(&still_frame(&joints));
        assert_eq!(report.state, AlertState::Idle);
        if let Some(metrics) = report.metrics {
            assert_eq!(metrics.avg_amplitude, 0.0);
            assert_eq!(metrics.avg_oscillation, 0.0);
            for joint in metrics.joints.values() {
                assert_eq!(joint.amplitude, 0.0);
                assert_eq!(joint.oscillation_count, 0);
            }
        }
    }

    assert!(!engine.status().seizure_detected);
    assert_eq!(dispatcher.calls(), 0);
}

#[test]
fn test_scenario_a_alert_starts_once_after_confirmation() {
    let (mut engine, dispatcher) = recording_engine(&scenario_config()).unwrap();
    let start = Local::now();

    // 14 filling frames, then 15 shaking frames over full windows
    let fired_at = drive_to_active(&mut engine, start);
    assert_eq!(fired_at, 28);
    assert_eq!(engine.state(), AlertState::Active);
    assert!(engine.status().seizure_detected);

    assert_eq!(dispatcher.wait_for(1, Duration::from_secs(5)), 1);

    let detected: Vec<_> = engine
        .log()
        .entries()
        .iter()
        .filter(|e| e.event_type == EventType::SeizureDetected)
        .collect();
    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0].details, "Initial Intensity: 12.0");
}

#[test]
fn test_scenario_b_alert_clears_on_last_hold_frame() {
    let (mut engine, dispatcher) = recording_engine(&scenario_config()).unwrap();
    let joints = upper_body();
    let start = Local::now();
    let fired_at = drive_to_active(&mut engine, start);

    let mut ended = Vec::new();
    for n in 1..=45 {
        let i = fired_at + n;
        // Mix calm frames, shaking frames and detection gaps
        let frame = match n % 3 {
            0 => LandmarkFrame::new(),
            1 => still_frame(&joints),
            _ => shaking_frame(&joints, i),
        };
        let report = engine.process_frame_at(&frame, frame_time(start, i));

        if n < 45 {
            assert_eq!(report.state, AlertState::Active, "cleared early at hold frame {n}");
        }
        if let Some(AlertSignal::Ended(event)) = report.signal {
            ended.push((n, event));
        }
    }

    assert_eq!(ended.len(), 1);
    let (n, event) = &ended[0];
    assert_eq!(*n, 45);
    assert!((event.duration_seconds - 3.0).abs() < 0.1, "duration {}", event.duration_seconds);
    assert!(event.max_intensity >= 12.0 - 1e-9);
    assert_eq!(engine.state(), AlertState::Idle);
    assert_eq!(engine.confirmation_counter(), 0);
    assert!(!engine.status().seizure_detected);

    let rows: Vec<_> = engine.log().export_rows().collect();
    let last = rows.iter().rev().find(|r| r.event == "Seizure Ended").unwrap();
    assert_eq!(last.duration, "3.0");

    // Dispatch happens only on the start edge
    dispatcher.wait_for(1, Duration::from_secs(5));
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(dispatcher.calls(), 1);
}

#[test]
fn test_scenario_c_flicker_never_alerts() {
    let mut config = scenario_config();
    // Three-sample windows let shaking switch on and off within a frame or two
    config.detection.sample_rate = 3;
    let (mut engine, dispatcher) = recording_engine(&config).unwrap();
    let joints = upper_body();

    let mut i = 0;
    for _ in 0..20 {
        for _ in 0..5 {
            let report = engine.process_frame(&shaking_frame(&joints, i));
            assert_ne!(report.state, AlertState::Active);
            i += 1;
        }
        for _ in 0..5 {
            let report = engine.process_frame(&still_frame(&joints));
            assert_ne!(report.state, AlertState::Active);
        }
        assert!(engine.confirmation_counter() < 15);
    }

    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(dispatcher.calls(), 0);
    assert!(engine
        .log()
        .entries()
        .iter()
        .all(|e| e.event_type != EventType::SeizureDetected));
}

#[test]
fn test_repeated_cycles_fire_each_edge_once_per_cycle() {
    let (mut engine, dispatcher) = recording_engine(&scenario_config()).unwrap();
    let joints = upper_body();
    let mut starts = 0;
    let mut ends = 0;

    for i in 0..400 {
        match engine.process_frame(&shaking_frame(&joints, i)).signal {
            Some(AlertSignal::Started { .. }) => {
                assert_eq!(starts, ends, "start without preceding end");
                starts += 1;
            }
            Some(AlertSignal::Ended(_)) => {
                ends += 1;
                assert_eq!(starts, ends, "end without preceding start");
            }
            None => {}
        }
    }

    // 14 fill + 15 confirm + 45 hold, then 15 confirm + 45 hold per cycle
    assert!(starts >= 6);
    assert_eq!(dispatcher.wait_for(starts, Duration::from_secs(5)), starts);
}

#[test]
fn test_provider_loop_runs_to_exhaustion() {
    let (mut engine, _dispatcher) = recording_engine(&scenario_config()).unwrap();
    let joints = upper_body();
    let frames: Vec<_> = (0..40).map(|i| shaking_frame(&joints, i)).collect();
    let mut provider = ScriptedLandmarks::new(frames);

    let processed = engine.run(&mut provider).unwrap();
    assert_eq!(processed, 40);
    assert_eq!(engine.frames_processed(), 40);
    assert_eq!(engine.state(), AlertState::Active);
}

#[test]
fn test_dispatch_outcome_recorded_in_log() {
    let (mut engine, dispatcher) = recording_engine(&scenario_config()).unwrap();
    drive_to_active(&mut engine, Local::now());
    dispatcher.wait_for(1, Duration::from_secs(5));

    let mut collected = 0;
    for _ in 0..100 {
        collected += engine.collect_dispatch_reports();
        if collected > 0 {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(collected, 1);
    let last = engine.log().last().unwrap();
    assert_eq!(last.event_type, EventType::AlertSent);
    assert_eq!(engine.status_board().log().last().map(|e| e.event_type), Some(EventType::AlertSent));
}

#[test]
fn test_single_joint_profile() {
    let mut config = scenario_config();
    config.detection.joints = Some(vec![JointId::Nose]);
    let (mut engine, _dispatcher) = recording_engine(&config).unwrap();

    let frames = (0..29).map(|i| LandmarkFrame::new().with(JointId::Nose, if i % 2 == 0 { 300.0 } else { 310.0 }));
    let signals: Vec<_> = frames.filter_map(|f| engine.process_frame(&f).signal).collect();
    assert_eq!(signals.len(), 1);
}
