use tokio::sync::mpsc::WeakUnboundedSender;

use crate::controller::session::SessionEvent;

/// Viewport geometry reported by a scroll event, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollPosition {
    pub const fn new(scroll_top: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            document_height,
        }
    }

    /// Bottom edge of the viewport is within `threshold_px` of the document end.
    pub fn is_near_bottom(&self, threshold_px: f64) -> bool {
        self.viewport_height + self.scroll_top >= self.document_height - threshold_px
    }
}

/// Scroll subscription that forwards near-bottom events to a search session.
///
/// Holds only a weak link to the session: once the session is torn down the
/// listener goes inert, and dropping the listener detaches it.
#[derive(Debug, Clone)]
pub struct ScrollListener {
    sink: WeakUnboundedSender<SessionEvent>,
    threshold_px: f64,
}

impl ScrollListener {
    pub(crate) fn new(sink: WeakUnboundedSender<SessionEvent>, threshold_px: f64) -> Self {
        Self { sink, threshold_px }
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    /// Handles one scroll event. Returns `true` when a near-bottom event was
    /// delivered to a live session.
    pub fn on_scroll(&self, position: ScrollPosition) -> bool {
        if !position.is_near_bottom(self.threshold_px) {
            return false;
        }
        match self.sink.upgrade() {
            Some(sender) => sender.send(SessionEvent::ScrollNearBottom).is_ok(),
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.sink.upgrade().is_some()
    }
}
