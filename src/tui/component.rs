use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into a rectangle of the frame.
///
/// Panel sections get their data as props (struct fields) and any state
/// that must outlive a frame through `&mut` borrows of `TuiState`. `render`
/// takes `&mut self` so a section can record what it laid out (rows,
/// viewport height, hit areas) for the event loop to use afterwards.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events and reports what they meant.
pub trait EventHandler {
    type Event;

    /// Returns `None` when the event was ignored or changed nothing.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
