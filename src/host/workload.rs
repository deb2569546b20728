//! Synthetic workload: a batch of scenes with everything a real viewer
//! page would register around them.

use serde::Serialize;
use std::sync::Arc;

use crate::cleanup::api::{CleanupCoordinator, HostBindings};
use crate::host::dom::{SimContainer, SimEventTarget};
use crate::host::facilities::{SimCache, SimCollector, SimFrameScheduler};
use crate::host::tracked::{FailureMode, TrackedResource};
use crate::host::viewer::{SimRenderer, SimViewer};
use crate::resources::api::{
    AnimationFrameId, ContainerHandle, Disposable, EventHandler, EventTarget, MaterialSlot,
    ResourceCategory, ResourceHandle, ResourceResult, Scene, SceneNode,
};

/// Upper bound on generated scene nodes across all scenes
pub const MAX_NODES: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadOptions {
    pub scenes: usize,
    /// Children per node
    pub children: usize,
    /// Levels below each scene root
    pub depth: usize,
    /// Every k-th disposable fails; zero disables failures
    pub fail_every: usize,
}

impl Default for WorkloadOptions {
    fn default() -> Self {
        Self {
            scenes: 1,
            children: 3,
            depth: 2,
            fail_every: 0,
        }
    }
}

impl WorkloadOptions {
    /// Nodes per scene (root included), or `None` once it passes
    /// [`MAX_NODES`]
    pub fn nodes_per_scene(&self) -> Option<usize> {
        let mut total: usize = 1;
        let mut width: usize = 1;
        for _ in 0..self.depth {
            width = width.checked_mul(self.children)?;
            if width == 0 {
                break;
            }
            total = total.checked_add(width)?;
            if total > MAX_NODES {
                return None;
            }
        }
        Some(total)
    }

    pub fn validate(&self) -> Result<(), String> {
        let total = self
            .nodes_per_scene()
            .and_then(|n| n.checked_mul(self.scenes));
        match total {
            Some(n) if n <= MAX_NODES => Ok(()),
            _ => Err(format!(
                "{} scene(s) of fan-out {} and depth {} exceed {} nodes",
                self.scenes, self.children, self.depth, MAX_NODES
            )),
        }
    }
}

/// What the host side looks like after a cleanup pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadSummary {
    pub disposables: usize,
    pub disposed: usize,
    pub failing: usize,
    pub viewers_running: usize,
    pub renderers_attached: usize,
    pub container_children: usize,
    pub listeners_attached: usize,
    pub pending_frames: usize,
    pub cache_entries: usize,
    pub collections: usize,
}

/// Everything built for one run, kept so the outcome can be inspected
pub struct Workload {
    options: WorkloadOptions,
    frames: Arc<SimFrameScheduler>,
    collector: Arc<SimCollector>,
    caches: Vec<Arc<SimCache>>,
    scenes: Vec<Arc<Scene>>,
    disposables: Vec<Arc<TrackedResource>>,
    loose: Vec<(ResourceCategory, Arc<TrackedResource>)>,
    viewers: Vec<Arc<SimViewer>>,
    containers: Vec<Arc<SimContainer>>,
    targets: Vec<Arc<SimEventTarget>>,
    frame_ids: Vec<AnimationFrameId>,
}

impl Workload {
    pub fn build(options: WorkloadOptions) -> Self {
        let mut workload = Self {
            options,
            frames: Arc::new(SimFrameScheduler::new()),
            collector: Arc::new(SimCollector::default()),
            caches: vec![
                Arc::new(SimCache::new("texture-loader", 8)),
                Arc::new(SimCache::new("splat-chunks", 32)),
            ],
            scenes: Vec::new(),
            disposables: Vec::new(),
            loose: Vec::new(),
            viewers: Vec::new(),
            containers: Vec::new(),
            targets: Vec::new(),
            frame_ids: Vec::new(),
        };

        for index in 0..options.scenes {
            let root = workload.build_tree(index);
            let hook = workload.tracked(format!("scene-{}/hook", index));
            workload
                .scenes
                .push(Arc::new(Scene::new(root).with_dispose_hook(hook)));

            let mut viewer = SimViewer::new(format!("viewer-{}", index), Some(SimRenderer::new()));
            if index % 2 == 0 {
                viewer = viewer.with_splat_mesh();
            }
            workload.viewers.push(Arc::new(viewer));

            workload.containers.push(Arc::new(
                SimContainer::new(format!("container-{}", index))
                    .with_children(["canvas", "loading-overlay", "info-panel"]),
            ));
            workload
                .targets
                .push(Arc::new(SimEventTarget::new(format!("window-{}", index))));
            let frame = workload.frames.request_animation_frame();
            workload.frame_ids.push(frame);

            let texture = workload.tracked(format!("texture-{}", index));
            workload.loose.push((ResourceCategory::Textures, texture));
            let geometry = workload.tracked(format!("geometry-{}", index));
            workload.loose.push((ResourceCategory::Geometries, geometry));
            let material = workload.tracked(format!("material-{}", index));
            workload.loose.push((ResourceCategory::Materials, material));
        }

        log::debug!(
            "Built workload: {} scene(s), {} disposable(s)",
            options.scenes,
            workload.disposables.len()
        );
        workload
    }

    fn tracked(&mut self, label: String) -> Arc<TrackedResource> {
        let failure = match self.options.fail_every {
            0 => FailureMode::Never,
            k if (self.disposables.len() + 1) % k == 0 => FailureMode::Error,
            _ => FailureMode::Never,
        };
        let resource = TrackedResource::with_failure(label, failure);
        self.disposables.push(Arc::clone(&resource));
        resource
    }

    /// Odd-indexed nodes get a two-sided material list
    fn mesh_node(&mut self, name: String, index: usize) -> SceneNode {
        let geometry = self.tracked(format!("{}/geometry", name));
        let material = if index % 2 == 1 {
            MaterialSlot::List(vec![
                self.tracked(format!("{}/material-front", name)) as Arc<dyn Disposable>,
                self.tracked(format!("{}/material-back", name)) as Arc<dyn Disposable>,
            ])
        } else {
            MaterialSlot::Single(self.tracked(format!("{}/material", name)))
        };
        SceneNode::new(name)
            .with_geometry(geometry)
            .with_material(material)
    }

    /// Build bottom-up, one level at a time, so deep trees need no recursion
    fn build_tree(&mut self, scene: usize) -> SceneNode {
        let fanout = self.options.children;
        let mut below: Vec<SceneNode> = Vec::new();
        for level in (1..=self.options.depth).rev() {
            let width = fanout.saturating_pow(level as u32);
            let mut rest = below.into_iter();
            let mut current = Vec::with_capacity(width);
            for index in 0..width {
                let mut node =
                    self.mesh_node(format!("scene-{}/L{}-{}", scene, level, index), index);
                for child in rest.by_ref().take(fanout) {
                    node.add(child);
                }
                current.push(node);
            }
            below = current;
        }

        let mut root = SceneNode::new(format!("scene-{}", scene));
        for child in below {
            root.add(child);
        }
        root
    }

    /// Register every handle with `coordinator`, attaching listeners through
    /// the tracked path
    pub fn register_with(&self, coordinator: &CleanupCoordinator) -> ResourceResult<()> {
        for (index, scene) in self.scenes.iter().enumerate() {
            coordinator.register(ResourceCategory::Scenes, Arc::clone(scene).into());
            coordinator.register(
                ResourceCategory::Viewers,
                ResourceHandle::Viewer(self.viewers[index].clone()),
            );
            coordinator.register(
                ResourceCategory::Containers,
                ResourceHandle::Container(self.containers[index].clone()),
            );

            let target: Arc<dyn EventTarget> = self.targets[index].clone();
            let on_resize: EventHandler = Arc::new(|event| log::trace!("{} handled", event));
            let on_key: EventHandler = Arc::new(|event| log::trace!("{} handled", event));
            coordinator.add_event_listener_tracked(Arc::clone(&target), "resize", on_resize)?;
            coordinator.add_event_listener_tracked(target, "keydown", on_key)?;

            coordinator.register(ResourceCategory::AnimationFrames, self.frame_ids[index].into());
        }

        for (category, resource) in &self.loose {
            let handle = match category {
                ResourceCategory::Textures => ResourceHandle::Texture(resource.clone()),
                ResourceCategory::Geometries => ResourceHandle::Geometry(resource.clone()),
                _ => ResourceHandle::Material(resource.clone()),
            };
            coordinator.register(*category, handle);
        }
        Ok(())
    }

    /// Bindings wired to this workload's scheduler, collector and caches
    pub fn host_bindings(&self) -> HostBindings {
        self.caches.iter().fold(
            HostBindings::new()
                .with_frame_scheduler(self.frames.clone())
                .with_collector(self.collector.clone()),
            |host, cache| host.with_cache(cache.clone()),
        )
    }

    pub fn summary(&self) -> WorkloadSummary {
        WorkloadSummary {
            disposables: self.disposables.len(),
            disposed: self.disposables.iter().filter(|r| r.is_disposed()).count(),
            failing: self
                .disposables
                .iter()
                .filter(|r| r.failure() != FailureMode::Never)
                .count(),
            viewers_running: self.viewers.iter().filter(|v| v.is_running()).count(),
            renderers_attached: self
                .viewers
                .iter()
                .filter_map(|v| v.sim_renderer())
                .filter(|r| r.dom_attached())
                .count(),
            container_children: self.containers.iter().map(|c| c.child_count()).sum(),
            listeners_attached: self.targets.iter().map(|t| t.listener_count()).sum(),
            pending_frames: self.frames.pending_count(),
            cache_entries: self.caches.iter().map(|c| c.len()).sum(),
            collections: self.collector.collections(),
        }
    }
}
