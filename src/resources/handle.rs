//! Tagged resource handles

use std::fmt;
use std::sync::Arc;

use crate::resources::scene::Scene;
use crate::resources::traits::{ContainerHandle, Disposable, ViewerHandle};
use crate::resources::types::{same_arc, AnimationFrameId, EventListenerEntry, ResourceCategory};

/// A live resource registered for cleanup. Each variant belongs to exactly
/// one [`ResourceCategory`].
#[derive(Clone)]
pub enum ResourceHandle {
    Viewer(Arc<dyn ViewerHandle>),
    Scene(Arc<Scene>),
    Container(Arc<dyn ContainerHandle>),
    EventListener(EventListenerEntry),
    AnimationFrame(AnimationFrameId),
    Texture(Arc<dyn Disposable>),
    Geometry(Arc<dyn Disposable>),
    Material(Arc<dyn Disposable>),
}

impl ResourceHandle {
    pub fn category(&self) -> ResourceCategory {
        match self {
            ResourceHandle::Viewer(_) => ResourceCategory::Viewers,
            ResourceHandle::Scene(_) => ResourceCategory::Scenes,
            ResourceHandle::Container(_) => ResourceCategory::Containers,
            ResourceHandle::EventListener(_) => ResourceCategory::EventListeners,
            ResourceHandle::AnimationFrame(_) => ResourceCategory::AnimationFrames,
            ResourceHandle::Texture(_) => ResourceCategory::Textures,
            ResourceHandle::Geometry(_) => ResourceCategory::Geometries,
            ResourceHandle::Material(_) => ResourceCategory::Materials,
        }
    }

    /// Only frame id zero can be null; every `Arc` refers to a live value.
    pub fn is_null(&self) -> bool {
        matches!(self, ResourceHandle::AnimationFrame(id) if id.is_null())
    }

    /// Identity comparison: the same underlying allocation (or frame id)
    pub fn same_handle(&self, other: &ResourceHandle) -> bool {
        use ResourceHandle::*;
        match (self, other) {
            (Viewer(a), Viewer(b)) => same_arc(a, b),
            (Scene(a), Scene(b)) => same_arc(a, b),
            (Container(a), Container(b)) => same_arc(a, b),
            (EventListener(a), EventListener(b)) => a.same_registration(b),
            (AnimationFrame(a), AnimationFrame(b)) => a == b,
            (Texture(a), Texture(b)) | (Geometry(a), Geometry(b)) | (Material(a), Material(b)) => {
                same_arc(a, b)
            }
            _ => false,
        }
    }

    /// Short human-readable description for diagnostics
    pub fn label(&self) -> String {
        match self {
            ResourceHandle::Viewer(v) => v.label().to_string(),
            ResourceHandle::Scene(s) => s.name(),
            ResourceHandle::Container(c) => c.label().to_string(),
            ResourceHandle::EventListener(e) => format!("{}:{}", e.target.label(), e.event),
            ResourceHandle::AnimationFrame(id) => id.to_string(),
            ResourceHandle::Texture(d) | ResourceHandle::Geometry(d) | ResourceHandle::Material(d) => {
                d.label().to_string()
            }
        }
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.category(), self.label())
    }
}

impl From<Arc<Scene>> for ResourceHandle {
    fn from(scene: Arc<Scene>) -> Self {
        ResourceHandle::Scene(scene)
    }
}

impl From<AnimationFrameId> for ResourceHandle {
    fn from(id: AnimationFrameId) -> Self {
        ResourceHandle::AnimationFrame(id)
    }
}

impl From<EventListenerEntry> for ResourceHandle {
    fn from(entry: EventListenerEntry) -> Self {
        ResourceHandle::EventListener(entry)
    }
}
