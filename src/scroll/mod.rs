use std::time::Duration;

use tokio::sync::mpsc;

use crate::surface::Viewport;

pub const DEFAULT_SCROLL_THRESHOLD: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollEvent {
    To(f64),
    By(f64),
    ToBottom,
}

impl ScrollEvent {
    /// The scroll offset this event moves to, before the surface clamps it.
    pub fn target(&self, viewport: &Viewport) -> f64 {
        match *self {
            Self::To(y) => y,
            Self::By(dy) => viewport.scroll_y + dy,
            Self::ToBottom => viewport.document_height,
        }
    }
}

// fires whenever the bottom of the viewport is within `threshold` pixels
// of the end of the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollController {
    threshold: f64,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl ScrollController {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn should_load(&self, viewport: &Viewport) -> bool {
        viewport.inner_height + viewport.scroll_y >= viewport.document_height - self.threshold
    }
}

/// Scripted reader: sends each event in `script`, pausing `interval` after
/// each one. Returns how many events were delivered.
pub async fn drive(
    tx: mpsc::Sender<ScrollEvent>,
    script: Vec<ScrollEvent>,
    interval: Duration,
) -> usize {
    let mut sent = 0;
    for event in script {
        if tx.send(event).await.is_err() {
            break;
        }
        sent += 1;
        tokio::time::sleep(interval).await;
    }
    sent
}

pub fn reader_script(scrolls: usize) -> Vec<ScrollEvent> {
    vec![ScrollEvent::ToBottom; scrolls]
}
