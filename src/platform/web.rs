//! `requestAnimationFrame` scheduling

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::frame::FrameScheduler;

/// The single JS callback every frame request points at
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Schedules frames on the browser's refresh cycle
#[derive(Clone)]
pub struct BrowserScheduler {
    window: web_sys::Window,
    callback: FrameCallback,
}

impl std::fmt::Debug for BrowserScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserScheduler").finish_non_exhaustive()
    }
}

impl BrowserScheduler {
    /// `None` outside a window context (e.g. in a worker)
    pub fn new(callback: FrameCallback) -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self { window, callback })
    }
}

impl FrameScheduler for BrowserScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> i32 {
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            log::error!("Frame requested before the frame callback was installed");
            return 0;
        };
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("requestAnimationFrame failed: {:?}", err);
                0
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame({}) failed: {:?}", handle, err);
        }
    }
}
