//! Public API for resource tracking
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::resources::error::{HandleError, HandleResult, ResourceError, ResourceResult};
pub use crate::resources::handle::ResourceHandle;
pub use crate::resources::registry::{Rejection, ResourceRegistry};
pub use crate::resources::scene::{MaterialSlot, PostOrder, Scene, SceneNode};
pub use crate::resources::traits::{
    Capability, ContainerHandle, Disposable, EventTarget, RendererHandle, ViewerHandle,
};
pub use crate::resources::types::{
    AnimationFrameId, EventHandler, EventListenerEntry, ResourceCategory, ResourceStats,
};
