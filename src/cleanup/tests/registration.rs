//! Tests for registering and unregistering handles

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::immediate_coordinator;
    use crate::cleanup::api::HostBindings;
    use crate::host::{SimEventTarget, TrackedResource};
    use crate::resources::api::{
        AnimationFrameId, Capability, EventHandler, EventTarget, HandleError, ResourceCategory,
        ResourceError, ResourceHandle,
    };

    struct InertTarget;

    impl EventTarget for InertTarget {}

    struct RefusingTarget;

    impl EventTarget for RefusingTarget {
        fn label(&self) -> &str {
            "refusing"
        }

        fn add_event_listener(&self, _event: &str, _handler: EventHandler) -> Capability {
            Some(Err(HandleError::failed("add listener", "target detached")))
        }
    }

    fn texture(label: &str) -> ResourceHandle {
        ResourceHandle::Texture(TrackedResource::new(label))
    }

    #[test]
    fn test_register_increments_only_its_category() {
        let coordinator = immediate_coordinator(HostBindings::new());
        let before = coordinator.resource_stats();

        coordinator.register(ResourceCategory::Textures, texture("albedo"));

        let after = coordinator.resource_stats();
        for category in ResourceCategory::all() {
            let expected = before[category] + usize::from(category == ResourceCategory::Textures);
            assert_eq!(after[category], expected, "{}", category);
        }
    }

    #[test]
    fn test_register_then_unregister_restores_stats() {
        let coordinator = immediate_coordinator(HostBindings::new());
        coordinator.register(ResourceCategory::Textures, texture("base"));
        let before = coordinator.resource_stats();

        let handle = texture("normal");
        coordinator.register(ResourceCategory::Textures, handle.clone());
        coordinator.unregister(ResourceCategory::Textures, &handle);

        assert_eq!(coordinator.resource_stats(), before);
    }

    #[test]
    fn test_unregister_unknown_handle_is_noop() {
        let coordinator = immediate_coordinator(HostBindings::new());
        coordinator.register(ResourceCategory::Textures, texture("kept"));

        coordinator.unregister(ResourceCategory::Textures, &texture("stranger"));
        coordinator.unregister(ResourceCategory::Materials, &texture("stranger"));

        assert_eq!(coordinator.resource_stats().total(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_kept_and_removed_once() {
        let coordinator = immediate_coordinator(HostBindings::new());
        let handle = texture("shared");
        coordinator.register(ResourceCategory::Textures, handle.clone());
        coordinator.register(ResourceCategory::Textures, handle.clone());
        assert_eq!(coordinator.resource_stats()[ResourceCategory::Textures], 2);

        coordinator.unregister(ResourceCategory::Textures, &handle);
        assert_eq!(coordinator.resource_stats()[ResourceCategory::Textures], 1);
    }

    #[test]
    fn test_malformed_registrations_are_ignored() {
        let coordinator = immediate_coordinator(HostBindings::new());

        coordinator.register(ResourceCategory::AnimationFrames, AnimationFrameId(0).into());
        coordinator.register(ResourceCategory::Materials, texture("wrong-bucket"));
        coordinator.register_named("shaders", Some(texture("unknown-category")));
        coordinator.register_named("textures", None);

        assert_eq!(coordinator.resource_stats().total(), 0);
    }

    #[test]
    fn test_register_named_uses_category_names() {
        let coordinator = immediate_coordinator(HostBindings::new());
        coordinator.register_named("animationFrames", Some(AnimationFrameId(3).into()));
        coordinator.register_named("textures", Some(texture("sky")));

        let stats = coordinator.resource_stats();
        assert_eq!(stats[ResourceCategory::AnimationFrames], 1);
        assert_eq!(stats[ResourceCategory::Textures], 1);
    }

    #[test]
    fn test_tracked_listener_is_attached_and_registered() {
        let coordinator = immediate_coordinator(HostBindings::new());
        let target = Arc::new(SimEventTarget::new("window"));
        let handler: EventHandler = Arc::new(|_| {});

        coordinator
            .add_event_listener_tracked(target.clone(), "resize", handler)
            .unwrap();

        assert_eq!(target.listener_count(), 1);
        assert_eq!(target.dispatch("resize"), 1);
        assert_eq!(
            coordinator.resource_stats()[ResourceCategory::EventListeners],
            1
        );
    }

    #[test]
    fn test_tracked_listener_failures_register_nothing() {
        let coordinator = immediate_coordinator(HostBindings::new());
        let handler: EventHandler = Arc::new(|_| {});

        let err = coordinator
            .add_event_listener_tracked(Arc::new(InertTarget), "click", handler.clone())
            .unwrap_err();
        assert!(matches!(err, ResourceError::ListenerUnsupported { .. }));

        let err = coordinator
            .add_event_listener_tracked(Arc::new(RefusingTarget), "click", handler)
            .unwrap_err();
        assert!(matches!(err, ResourceError::ListenerAttach { ref target, .. } if target == "refusing"));

        assert_eq!(coordinator.resource_stats().total(), 0);
    }
}
