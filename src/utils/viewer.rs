//! Viewer implementations

use crate::common::{Configuration, Viewer};

/// Viewer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewer;

impl Viewer for NoopViewer {
    fn draw_configuration_vertex(&mut self, _q: &Configuration) {}
}

/// Viewer that keeps every vertex and edge it is shown, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingViewer {
    pub vertices: Vec<Configuration>,
    pub edges: Vec<(Configuration, Configuration)>,
    /// Number of searches started while attached
    pub resets: usize,
}

impl RecordingViewer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Viewer for RecordingViewer {
    fn draw_configuration_vertex(&mut self, q: &Configuration) {
        self.vertices.push(q.clone());
    }

    fn draw_configuration_edge(&mut self, from: &Configuration, to: &Configuration) {
        self.edges.push((from.clone(), to.clone()));
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.resets += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    #[test]
    fn test_recording_viewer_reset() {
        let a = DVector::from_vec(vec![0.0, 0.0]);
        let b = DVector::from_vec(vec![1.0, 0.0]);

        let mut viewer = RecordingViewer::new();
        viewer.draw_configuration_vertex(&a);
        viewer.draw_configuration_vertex(&b);
        viewer.draw_configuration_edge(&a, &b);
        assert_eq!(viewer.vertices.len(), 2);
        assert_eq!(viewer.edges, vec![(a.clone(), b.clone())]);

        viewer.reset();
        assert!(viewer.vertices.is_empty());
        assert!(viewer.edges.is_empty());
        assert_eq!(viewer.resets, 1);
    }
}
