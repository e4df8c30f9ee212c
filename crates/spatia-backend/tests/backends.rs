//! Cross-backend behavior: every backend keeps the generic baseline and adds
//! its own parameters on top.

use std::sync::Arc;

use spatia_backend::{
    BackendConfig, NullBackend, OpenAlBackend, PlatformBackend, ReferenceAlDriver,
    SpatialBackend, VirtualEndpoint,
};
use spatia_core::{
    AudioProfile, ListenerPose, Motion, Orientation, ProcessOptions, SpatialProcessor,
    SpatialRequest, Vec3,
};

fn initialized_backends() -> Vec<Box<dyn SpatialBackend>> {
    let backends: Vec<Box<dyn SpatialBackend>> = vec![
        Box::new(NullBackend::new()),
        Box::new(OpenAlBackend::with_driver(Arc::new(ReferenceAlDriver::new()))),
        Box::new(PlatformBackend::with_endpoint(Arc::new(
            VirtualEndpoint::surround_7_1_4(),
        ))),
    ];
    for backend in &backends {
        backend.initialize(&BackendConfig::default()).unwrap();
    }
    backends
}

#[test]
fn generic_baseline_is_shared() {
    let backends = initialized_backends();

    let profile = AudioProfile::new("Ash")
        .with_frequency_range(200.0, 2000.0)
        .with_volume_db(-12.0);
    let listener = ListenerPose::new(Vec3::new(0.0, 2.0, 0.0), Orientation::new(45.0, 0.0, 0.0));
    let request = SpatialRequest::new(&profile, Vec3::new(10.0, 2.0, 5.0), listener)
        .with_occlusion(0.3);
    let baseline = SpatialProcessor::default()
        .process(&request, ProcessOptions::default())
        .unwrap();

    for backend in &backends {
        let result = backend.process(&request).unwrap();
        assert_eq!(result.backend, backend.id());
        assert_eq!(result.distance, baseline.distance, "{}", backend.id());
        assert_eq!(result.pan, baseline.pan, "{}", backend.id());
        assert_eq!(
            result.attenuated_volume_db, baseline.attenuated_volume_db,
            "{}",
            backend.id()
        );
        assert_eq!(result.relative_angle_deg, baseline.relative_angle_deg);
        assert_eq!(result.frequency_range, baseline.frequency_range);
        assert!(result.param("processing_applied").is_some());
    }
}

#[test]
fn doppler_only_from_capable_backends() {
    let backends = initialized_backends();

    let profile = AudioProfile::new("Thermite");
    let request = SpatialRequest::new(&profile, Vec3::new(0.0, 0.0, 10.0), ListenerPose::default())
        .with_motion(Motion::new(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, 0.1));

    for backend in &backends {
        let result = backend.process(&request).unwrap();
        assert_eq!(
            result.doppler_shift.is_some(),
            backend.capabilities().doppler,
            "{}",
            backend.id()
        );
    }
}

#[test]
fn capabilities_match_descriptors() {
    for backend in initialized_backends() {
        let descriptor = backend.descriptor();
        assert_eq!(descriptor.id, backend.id());
        assert_eq!(descriptor.capabilities, backend.capabilities());
        backend.shutdown();
        assert!(!backend.is_initialized());
        assert_eq!(backend.capabilities(), descriptor.capabilities);
    }
}

#[test]
fn platform_declares_elevation_openal_does_not() {
    let platform = PlatformBackend::with_endpoint(Arc::new(VirtualEndpoint::stereo()));
    let openal = OpenAlBackend::with_driver(Arc::new(ReferenceAlDriver::unavailable()));
    assert!(platform.capabilities().elevation);
    assert!(!openal.capabilities().elevation);
    assert_eq!(platform.capabilities().max_sources, Some(128));
    assert_eq!(openal.capabilities().max_sources, Some(256));
    assert!(!NullBackend::new().capabilities().doppler);
}
