//! Resource categories and the plain data types stored in the registry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

use crate::resources::traits::EventTarget;

/// Classification bucket a handle is registered under.
///
/// The declaration order is the canonical reporting order. Names use the
/// camelCase form (`eventListeners`, `animationFrames`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum ResourceCategory {
    Viewers,
    Scenes,
    Containers,
    EventListeners,
    AnimationFrames,
    Textures,
    Geometries,
    Materials,
}

impl ResourceCategory {
    /// All categories in reporting order
    pub fn all() -> impl Iterator<Item = ResourceCategory> {
        Self::iter()
    }
}

/// Host-issued animation frame request id. Zero is never issued and is
/// treated as a null handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationFrameId(pub u64);

impl AnimationFrameId {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AnimationFrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Listener callback; identity (not behaviour) is what removal matches on.
pub type EventHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// A listener registration tracked for automatic removal
#[derive(Clone)]
pub struct EventListenerEntry {
    pub target: Arc<dyn EventTarget>,
    pub event: String,
    pub handler: EventHandler,
}

impl EventListenerEntry {
    pub fn new(target: Arc<dyn EventTarget>, event: impl Into<String>, handler: EventHandler) -> Self {
        Self {
            target,
            event: event.into(),
            handler,
        }
    }

    /// Same target, same event name and the same handler instance
    pub fn same_registration(&self, other: &EventListenerEntry) -> bool {
        same_arc(&self.target, &other.target)
            && self.event == other.event
            && same_arc(&self.handler, &other.handler)
    }
}

impl fmt::Debug for EventListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListenerEntry")
            .field("target", &self.target.label())
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Pointer identity for possibly-unsized `Arc`s, ignoring vtable metadata
pub(crate) fn same_arc<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Live handle count per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceStats {
    counts: BTreeMap<ResourceCategory, usize>,
}

impl ResourceStats {
    pub(crate) fn from_counts(counts: BTreeMap<ResourceCategory, usize>) -> Self {
        Self { counts }
    }

    pub fn count(&self, category: ResourceCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceCategory, usize)> + '_ {
        self.counts.iter().map(|(category, count)| (*category, *count))
    }
}

impl std::ops::Index<ResourceCategory> for ResourceStats {
    type Output = usize;

    fn index(&self, category: ResourceCategory) -> &usize {
        self.counts.get(&category).unwrap_or(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::EnumCount;

    #[test]
    fn test_category_names_round_trip() {
        for category in ResourceCategory::all() {
            let name = category.to_string();
            assert_eq!(ResourceCategory::from_str(&name).unwrap(), category);
        }
        assert_eq!(ResourceCategory::EventListeners.as_ref(), "eventListeners");
        assert_eq!(ResourceCategory::AnimationFrames.to_string(), "animationFrames");
        assert!(ResourceCategory::from_str("shaders").is_err());
    }

    #[test]
    fn test_category_order_matches_declaration() {
        let names: Vec<String> = ResourceCategory::all().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "viewers",
                "scenes",
                "containers",
                "eventListeners",
                "animationFrames",
                "textures",
                "geometries",
                "materials"
            ]
        );
        assert_eq!(ResourceCategory::COUNT, 8);
    }

    #[test]
    fn test_stats_index_and_serialization() {
        let mut counts = BTreeMap::new();
        counts.insert(ResourceCategory::Scenes, 2);
        counts.insert(ResourceCategory::Textures, 1);
        let stats = ResourceStats::from_counts(counts);

        assert_eq!(stats[ResourceCategory::Scenes], 2);
        assert_eq!(stats[ResourceCategory::Viewers], 0);
        assert_eq!(stats.total(), 3);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["scenes"], 2);
        assert_eq!(json["textures"], 1);
    }

    #[test]
    fn test_null_frame_id() {
        assert!(AnimationFrameId(0).is_null());
        assert!(!AnimationFrameId(7).is_null());
        assert_eq!(AnimationFrameId(7).to_string(), "frame#7");
    }
}
