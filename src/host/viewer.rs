//! Simulated viewer and renderer

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::host::tracked::FailureMode;
use crate::resources::api::{Capability, RendererHandle, ViewerHandle};

/// GPU renderer with an attached canvas
#[derive(Debug)]
pub struct SimRenderer {
    context_lost: AtomicBool,
    dom_attached: AtomicBool,
    disposals: AtomicUsize,
    failure: FailureMode,
}

impl SimRenderer {
    pub fn new() -> Arc<Self> {
        Self::with_failure(FailureMode::Never)
    }

    /// Renderer whose `dispose` misbehaves; the other calls still succeed
    pub fn with_failure(failure: FailureMode) -> Arc<Self> {
        Arc::new(Self {
            context_lost: AtomicBool::new(false),
            dom_attached: AtomicBool::new(true),
            disposals: AtomicUsize::new(0),
            failure,
        })
    }

    pub fn context_lost(&self) -> bool {
        self.context_lost.load(Ordering::SeqCst)
    }

    pub fn dom_attached(&self) -> bool {
        self.dom_attached.load(Ordering::SeqCst)
    }

    pub fn dispose_count(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }
}

impl RendererHandle for SimRenderer {
    fn force_context_loss(&self) -> Capability {
        self.context_lost.store(true, Ordering::SeqCst);
        Some(Ok(()))
    }

    fn dispose(&self) -> Capability {
        self.disposals.fetch_add(1, Ordering::SeqCst);
        self.failure.outcome("renderer dispose", "renderer")
    }

    fn detach_dom_element(&self) -> Capability {
        self.dom_attached.store(false, Ordering::SeqCst);
        Some(Ok(()))
    }
}

/// Viewer running a render loop, optionally with a splat mesh
#[derive(Debug)]
pub struct SimViewer {
    label: String,
    renderer: Option<Arc<SimRenderer>>,
    splat_mesh: bool,
    stop_failure: FailureMode,
    running: AtomicBool,
    disposals: AtomicUsize,
}

impl SimViewer {
    pub fn new(label: impl Into<String>, renderer: Option<Arc<SimRenderer>>) -> Self {
        Self {
            label: label.into(),
            renderer,
            splat_mesh: false,
            stop_failure: FailureMode::Never,
            running: AtomicBool::new(true),
            disposals: AtomicUsize::new(0),
        }
    }

    pub fn with_splat_mesh(mut self) -> Self {
        self.splat_mesh = true;
        self
    }

    /// Make `stop` misbehave
    pub fn with_stop_failure(mut self, failure: FailureMode) -> Self {
        self.stop_failure = failure;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn dispose_count(&self) -> usize {
        self.disposals.load(Ordering::SeqCst)
    }

    pub fn sim_renderer(&self) -> Option<&Arc<SimRenderer>> {
        self.renderer.as_ref()
    }
}

impl ViewerHandle for SimViewer {
    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&self) -> Capability {
        if self.stop_failure == FailureMode::Never {
            self.running.store(false, Ordering::SeqCst);
        }
        self.stop_failure.outcome("stop", &self.label)
    }

    fn renderer(&self) -> Option<Arc<dyn RendererHandle>> {
        self.renderer
            .as_ref()
            .map(|r| Arc::clone(r) as Arc<dyn RendererHandle>)
    }

    fn has_splat_mesh(&self) -> bool {
        self.splat_mesh
    }

    fn dispose(&self) -> Capability {
        self.disposals.fetch_add(1, Ordering::SeqCst);
        Some(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_exposes_renderer() {
        let viewer = SimViewer::new("main", Some(SimRenderer::new())).with_splat_mesh();
        assert!(viewer.is_running());
        assert!(viewer.has_splat_mesh());

        let renderer = viewer.renderer().unwrap();
        renderer.force_context_loss();
        renderer.detach_dom_element();

        let sim = viewer.sim_renderer().unwrap();
        assert!(sim.context_lost());
        assert!(!sim.dom_attached());
    }

    #[test]
    fn test_failed_stop_keeps_viewer_running() {
        let viewer = SimViewer::new("stubborn", None).with_stop_failure(FailureMode::Error);
        assert!(matches!(viewer.stop(), Some(Err(_))));
        assert!(viewer.is_running());
        assert!(viewer.renderer().is_none());
    }
}
