//! Cleanup coordinator integration tests
//!
//! Drive the public API end to end with the reference host.

mod common;

use std::sync::Arc;

use common::immediate_coordinator;
use scenesweep::cleanup::api::{CleanupConfig, CleanupOutcome, CleanupPhase, HostBindings};
use scenesweep::host::{
    FailureMode, SimCollector, SimContainer, SimEventTarget, SimFrameScheduler, SimRenderer,
    SimViewer, TrackedResource, Workload, WorkloadOptions,
};
use scenesweep::resources::api::{
    EventHandler, MaterialSlot, ResourceCategory, ResourceHandle, Scene, SceneNode,
};

#[tokio::test]
async fn test_viewer_page_teardown() {
    let frames = Arc::new(SimFrameScheduler::new());
    let collector = Arc::new(SimCollector::default());
    let coordinator = immediate_coordinator(
        HostBindings::new()
            .with_frame_scheduler(frames.clone())
            .with_collector(collector.clone()),
    );

    let renderer = SimRenderer::new();
    let viewer = Arc::new(SimViewer::new("main", Some(renderer.clone())).with_splat_mesh());
    let container = Arc::new(SimContainer::new("viewer-root").with_children(["canvas"]));
    let window = Arc::new(SimEventTarget::new("window"));
    let geometry = TrackedResource::new("splat/geometry");
    let material = TrackedResource::new("splat/material");
    let scene = Arc::new(Scene::new(
        SceneNode::new("root").with_child(
            SceneNode::new("splat")
                .with_geometry(geometry.clone())
                .with_material(MaterialSlot::Single(material.clone())),
        ),
    ));

    coordinator.register(ResourceCategory::Viewers, ResourceHandle::Viewer(viewer.clone()));
    coordinator.register(ResourceCategory::Scenes, scene.into());
    coordinator.register(
        ResourceCategory::Containers,
        ResourceHandle::Container(container.clone()),
    );
    coordinator.register(
        ResourceCategory::AnimationFrames,
        frames.request_animation_frame().into(),
    );
    let on_resize: EventHandler = Arc::new(|_| {});
    coordinator
        .add_event_listener_tracked(window.clone(), "resize", on_resize)
        .unwrap();

    let outcome = coordinator.cleanup().await;

    let report = outcome.report().unwrap();
    assert_eq!(report.total_failures(), 0);
    assert!(report.status.all_clean);
    assert!(!viewer.is_running());
    assert!(renderer.context_lost());
    assert!(!renderer.dom_attached());
    assert_eq!(viewer.dispose_count(), 1);
    assert!(geometry.is_disposed() && material.is_disposed());
    assert_eq!(frames.pending_count(), 0);
    assert_eq!(window.listener_count(), 0);
    assert_eq!(collector.collections(), 2);
}

#[tokio::test]
async fn test_phases_reported_in_order() {
    let coordinator = immediate_coordinator(HostBindings::new());

    let outcome = coordinator.cleanup().await;

    let phases: Vec<CleanupPhase> = outcome
        .report()
        .unwrap()
        .phases
        .iter()
        .map(|p| p.phase)
        .collect();
    assert_eq!(
        phases,
        vec![
            CleanupPhase::AnimationFrames,
            CleanupPhase::Scenes,
            CleanupPhase::Viewers,
            CleanupPhase::Containers,
            CleanupPhase::EventListeners,
            CleanupPhase::LooseResources,
            CleanupPhase::ExternalCaches,
            CleanupPhase::GarbageCollection,
        ]
    );
}

#[tokio::test]
async fn test_failing_workload_still_ends_clean() {
    let workload = Workload::build(WorkloadOptions {
        scenes: 2,
        children: 2,
        depth: 2,
        fail_every: 2,
    });
    let coordinator = immediate_coordinator(workload.host_bindings());
    workload.register_with(&coordinator).unwrap();

    let outcome = coordinator.cleanup().await;

    let summary = workload.summary();
    assert!(summary.failing > 0);
    assert_eq!(outcome.report().unwrap().total_failures(), summary.failing);
    assert_eq!(summary.disposed, summary.disposables);
    assert!(coordinator.cleanup_status().all_clean);
}

#[tokio::test]
async fn test_deep_scene_released_without_overflow() {
    let mut node = SceneNode::new("leaf").with_geometry(TrackedResource::new("leaf/geometry"));
    for depth in 0..100_000 {
        node = SceneNode::new(format!("n{}", depth)).with_child(node);
    }
    let scene = Arc::new(Scene::new(node));
    let coordinator = immediate_coordinator(HostBindings::new());
    coordinator.register(ResourceCategory::Scenes, scene.clone().into());

    coordinator.cleanup().await;

    assert_eq!(scene.node_count(), 1);
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let coordinator = immediate_coordinator(HostBindings::new());
    coordinator.register(
        ResourceCategory::Materials,
        ResourceHandle::Material(TrackedResource::with_failure("bad", FailureMode::Error)),
    );

    let CleanupOutcome::Finished(report) = coordinator.cleanup().await else {
        panic!("expected a finished pass");
    };
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["phases"][5]["phase"], "loose-resources");
    assert_eq!(json["phases"][5]["failures"], 1);
    assert_eq!(json["status"]["all_clean"], true);
    assert!(json["schema_version"].as_u64().unwrap() > 0);
}

#[test]
fn test_config_round_trip_through_toml() {
    let config = CleanupConfig::from_toml_str(
        "[cleanup]\ngc_delay_ms = 0\nverify_delay_ms = 10\nlog_memory = false\n",
    )
    .unwrap();
    assert_eq!(
        config,
        CleanupConfig {
            gc_delay_ms: 0,
            verify_delay_ms: 10,
            log_memory: false,
        }
    );
}
