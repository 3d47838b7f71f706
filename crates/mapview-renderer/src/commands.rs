use std::collections::VecDeque;

use mapview_core::{MapRenderConfig, MarkerSpec, ViewportSpec};

/// A draw request, captured while the tile library is still loading.
///
/// Each variant is a single unit in the queue: the markers of a
/// [`DrawCommand::Config`] can never be separated from its viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Viewport(ViewportSpec),
    Marker(MarkerSpec),
    MarkerList(Vec<MarkerSpec>),
    Config(MapRenderConfig),
}

impl DrawCommand {
    /// Human-readable description for logs.
    pub fn description(&self) -> &str {
        match self {
            DrawCommand::Viewport(_) => "Draw viewport",
            DrawCommand::Marker(_) => "Add marker",
            DrawCommand::MarkerList(_) => "Add marker list",
            DrawCommand::Config(_) => "Render config",
        }
    }

    /// Whether running this command places markers.
    pub fn places_markers(&self) -> bool {
        match self {
            DrawCommand::Viewport(_) => false,
            DrawCommand::Marker(_) => true,
            DrawCommand::MarkerList(markers) => !markers.is_empty(),
            DrawCommand::Config(config) => !config.markers.is_empty(),
        }
    }
}

/// FIFO of draw commands waiting for the asset load to finish.
///
/// There is no way to withdraw a single command; the queue is either drained
/// in arrival order or discarded as a whole.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<DrawCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        log::debug!("Queued: {}", command.description());
        self.pending.push_back(command);
    }

    /// Take every pending command, oldest first, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        self.pending.drain(..).collect()
    }

    /// Drop every pending command, returning how many were dropped.
    pub fn discard(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = CommandQueue::new();
        queue.push(DrawCommand::Viewport(ViewportSpec::new(0.0, 0.0, 1.0)));
        queue.push(DrawCommand::Marker(MarkerSpec::new(1.0, 1.0)));
        queue.push(DrawCommand::Marker(MarkerSpec::new(2.0, 2.0)));
        assert_eq!(queue.len(), 3);

        let drained = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(
            drained,
            vec![
                DrawCommand::Viewport(ViewportSpec::new(0.0, 0.0, 1.0)),
                DrawCommand::Marker(MarkerSpec::new(1.0, 1.0)),
                DrawCommand::Marker(MarkerSpec::new(2.0, 2.0)),
            ]
        );
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_discard() {
        let mut queue = CommandQueue::new();
        queue.push(DrawCommand::MarkerList(vec![]));
        queue.push(DrawCommand::Config(MapRenderConfig::default()));
        assert_eq!(queue.discard(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_places_markers() {
        assert!(!DrawCommand::Viewport(ViewportSpec::default()).places_markers());
        assert!(!DrawCommand::MarkerList(vec![]).places_markers());
        assert!(DrawCommand::Config(MapRenderConfig::default().with_marker(1.0, 2.0)).places_markers());
    }
}
