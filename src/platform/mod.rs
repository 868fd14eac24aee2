//! Platform abstraction layer
//!
//! Browser hosting lives in `web`: canvas surface, frame scheduling and the
//! resize listener. Native builds drive [`crate::Engine`] directly.

use std::cell::Cell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{Backdrop, CanvasSurface};

/// Id of the pending animation-frame request
///
/// Shared by the frame loop and its owner. Lives outside the engine's
/// `RefCell` so the owner can cancel while a frame holds the engine.
#[derive(Debug, Clone, Default)]
pub struct FrameRequest(Rc<Cell<Option<i32>>>);

impl FrameRequest {
    pub fn set(&self, id: i32) {
        self.0.set(Some(id));
    }

    /// Mark the request as fired
    pub fn clear(&self) {
        self.0.set(None);
    }

    /// Id to cancel, if a request is still pending
    pub fn take(&self) -> Option<i32> {
        self.0.take()
    }

    pub fn is_pending(&self) -> bool {
        self.0.get().is_some()
    }
}
