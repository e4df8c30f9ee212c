//! End-to-end checks of the processor against hand-computed poses.

use spatia_core::{
    AudioProfile, ListenerPose, Motion, Orientation, ProcessOptions, ProcessorSettings,
    SpatialError, SpatialProcessor, SpatialRequest, Vec3,
};

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() < tol
}

#[test]
fn footsteps_to_the_right_front() {
    let profile = AudioProfile::new("Ash")
        .with_frequency_range(200.0, 2000.0)
        .with_volume_db(-12.0)
        .with_falloff(2.0);
    let listener = ListenerPose::new(Vec3::new(0.0, 2.0, 0.0), Orientation::new(45.0, 0.0, 0.0));
    let request = SpatialRequest::new(&profile, Vec3::new(10.0, 2.0, 5.0), listener);

    let r = SpatialProcessor::default()
        .process(&request, ProcessOptions::default())
        .unwrap();

    assert!(approx(r.distance, 11.1803, 1e-3));
    assert!(approx(r.relative_angle_deg, 18.43, 0.01));
    assert!(approx(r.pan, 0.3162, 1e-3));
    assert!(approx(r.attenuated_volume_db, -14.0969, 1e-3));
    assert_eq!(r.frequency_range, profile.frequency_range);
    assert_eq!(r.reverb_amount, profile.reverb_amount);
    assert!(r.parameters.is_empty());
    assert!(r.backend.is_empty());
}

#[test]
fn same_result_for_wrapped_orientation() {
    let profile = AudioProfile::new("p");
    let source = Vec3::new(-3.0, 1.0, 7.0);
    let processor = SpatialProcessor::default();

    let a = processor
        .process(
            &SpatialRequest::new(
                &profile,
                source,
                ListenerPose::new(Vec3::ZERO, Orientation::new(30.0, 0.0, 0.0)),
            ),
            ProcessOptions::default(),
        )
        .unwrap();
    let b = processor
        .process(
            &SpatialRequest::new(
                &profile,
                source,
                ListenerPose::new(
                    Vec3::ZERO,
                    Orientation {
                        yaw: 390.0,
                        pitch: 0.0,
                        roll: 0.0,
                    },
                ),
            ),
            ProcessOptions::default(),
        )
        .unwrap();

    assert!(approx(a.pan, b.pan, 1e-4));
    assert!(approx(a.relative_angle_deg, b.relative_angle_deg, 1e-2));
}

#[test]
fn custom_settings_change_floor_and_penalty() {
    let settings = ProcessorSettings {
        occlusion_penalty_db: 12.0,
        min_audible_db: -60.0,
        ..ProcessorSettings::default()
    };
    let processor = SpatialProcessor::new(settings);
    let profile = AudioProfile::new("p").with_volume_db(-50.0).with_falloff(20.0);

    let far = SpatialRequest::new(&profile, Vec3::new(0.0, 0.0, 1000.0), ListenerPose::default());
    let r = processor.process(&far, ProcessOptions::default()).unwrap();
    assert_eq!(r.attenuated_volume_db, -60.0);

    let near_profile = AudioProfile::new("q");
    let near = SpatialRequest::new(&near_profile, Vec3::Z, ListenerPose::default())
        .with_occlusion(1.0);
    let r = processor.process(&near, ProcessOptions::default()).unwrap();
    assert!(approx(r.attenuated_volume_db, -27.0, 1e-4));
}

#[test]
fn receding_source_lowers_pitch() {
    let profile = AudioProfile::new("p");
    let request = SpatialRequest::new(&profile, Vec3::new(0.0, 0.0, 30.0), ListenerPose::default())
        .with_motion(Motion::new(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO, 1.0));
    let r = SpatialProcessor::default()
        .process(&request, ProcessOptions::with_doppler())
        .unwrap();
    let shift = r.doppler_shift.unwrap();
    assert!(shift < 1.0);
    assert!(approx(shift, 343.0 / 353.0, 1e-5));
}

#[test]
fn invalid_pose_reports_kind() {
    let profile = AudioProfile::new("p");
    let request = SpatialRequest::new(
        &profile,
        Vec3::new(f32::NAN, 0.0, 0.0),
        ListenerPose::default(),
    );
    let err = SpatialProcessor::default()
        .process(&request, ProcessOptions::default())
        .unwrap_err();
    assert!(matches!(err, SpatialError::InvalidPose(_)));
    assert_eq!(err.kind(), "invalid_pose");
}
