//! Capability traits implemented by host handles.
//!
//! Every capability is optional. A method returns `None` when the handle
//! does not expose the capability, and `Some(result)` when it was invoked.
//! The default implementations report absence, so a host type only
//! implements what it actually supports.

use std::sync::Arc;

use crate::resources::error::HandleResult;
use crate::resources::types::EventHandler;

/// Outcome of invoking an optional capability
pub type Capability = Option<HandleResult>;

/// Textures, geometries, materials and scene dispose hooks
pub trait Disposable: Send + Sync {
    fn label(&self) -> &str {
        "resource"
    }

    fn dispose(&self) -> Capability {
        None
    }
}

/// Rendering viewer (a camera/controls/renderer bundle)
pub trait ViewerHandle: Send + Sync {
    fn label(&self) -> &str {
        "viewer"
    }

    /// Stop the render loop
    fn stop(&self) -> Capability {
        None
    }

    /// Renderer owned by this viewer, if one is attached
    fn renderer(&self) -> Option<Arc<dyn RendererHandle>> {
        None
    }

    /// Whether a splat mesh (point-cloud renderable) is attached
    fn has_splat_mesh(&self) -> bool {
        false
    }

    fn dispose(&self) -> Capability {
        None
    }
}

/// GPU renderer attached to a viewer
pub trait RendererHandle: Send + Sync {
    /// Force the rendering context to be lost so the driver frees it now
    fn force_context_loss(&self) -> Capability {
        None
    }

    fn dispose(&self) -> Capability {
        None
    }

    /// Drop the renderer's reference to its DOM canvas
    fn detach_dom_element(&self) -> Capability {
        None
    }
}

/// DOM container element that hosts a canvas and overlays
pub trait ContainerHandle: Send + Sync {
    fn label(&self) -> &str {
        "container"
    }

    fn child_count(&self) -> usize {
        0
    }

    fn remove_first_child(&self) -> Capability {
        None
    }
}

/// Anything listeners can be attached to
pub trait EventTarget: Send + Sync {
    fn label(&self) -> &str {
        "event-target"
    }

    fn add_event_listener(&self, _event: &str, _handler: EventHandler) -> Capability {
        None
    }

    fn remove_event_listener(&self, _event: &str, _handler: &EventHandler) -> Capability {
        None
    }
}
