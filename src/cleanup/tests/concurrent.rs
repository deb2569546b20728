//! Tests for overlapping cleanup requests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::task::JoinSet;

    use crate::cleanup::api::{
        CleanupConfig, CleanupCoordinator, CleanupOutcome, CoordinatorState, HostBindings,
    };
    use crate::host::{FixedHeapProbe, TrackedResource};
    use crate::resources::api::{ResourceCategory, ResourceHandle};

    fn slow_coordinator() -> CleanupCoordinator {
        CleanupCoordinator::new()
            .with_host(HostBindings::new().with_heap_probe(Arc::new(FixedHeapProbe(None))))
            .with_config(CleanupConfig {
                gc_delay_ms: 50,
                verify_delay_ms: 0,
                log_memory: false,
            })
    }

    #[tokio::test]
    async fn test_reentrant_cleanup_is_rejected() {
        let coordinator = slow_coordinator();
        let texture = TrackedResource::new("albedo");
        coordinator.register(ResourceCategory::Textures, ResourceHandle::Texture(texture.clone()));

        let (first, second) = tokio::join!(coordinator.cleanup(), async {
            let state = coordinator.state();
            (state, coordinator.cleanup().await)
        });

        assert!(matches!(first, CleanupOutcome::Finished(_)));
        assert_eq!(second.0, CoordinatorState::CleaningUp);
        assert_eq!(second.1, CleanupOutcome::AlreadyInProgress);
        assert_eq!(texture.dispose_count(), 1);
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
    }

    #[tokio::test]
    async fn test_rejected_call_leaves_registrations_alone() {
        let coordinator = slow_coordinator();

        let (_, late) = tokio::join!(coordinator.cleanup(), async {
            // Registered while the first pass sleeps in its collection phase
            let late = TrackedResource::new("late");
            coordinator.register(ResourceCategory::Textures, ResourceHandle::Texture(late.clone()));
            assert_eq!(
                coordinator.cleanup().await,
                CleanupOutcome::AlreadyInProgress
            );
            late
        });

        assert!(!late.is_disposed());
        assert_eq!(coordinator.resource_stats()[ResourceCategory::Textures], 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_requests_dispose_each_handle_once() {
        let coordinator = Arc::new(slow_coordinator());
        let resources: Vec<_> = (0..16)
            .map(|i| TrackedResource::new(format!("tex-{}", i)))
            .collect();
        for resource in &resources {
            coordinator.register(
                ResourceCategory::Textures,
                ResourceHandle::Texture(resource.clone()),
            );
        }

        let mut tasks = JoinSet::new();
        for _ in 0..8 {
            let coordinator = Arc::clone(&coordinator);
            tasks.spawn(async move { coordinator.cleanup().await });
        }

        let mut finished = 0;
        while let Some(result) = tasks.join_next().await {
            if matches!(result.unwrap(), CleanupOutcome::Finished(_)) {
                finished += 1;
            }
        }

        assert!(finished >= 1);
        assert!(resources.iter().all(|r| r.dispose_count() == 1));
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
    }
}
