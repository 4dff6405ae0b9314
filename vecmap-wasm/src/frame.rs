use std::cell::RefCell;
use std::rc::Rc;
use vecmap::FrameHost;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame`-backed frame host.
pub struct RafHost {
    window: web_sys::Window,
    callback: FrameCallback,
}

impl RafHost {
    pub fn new(window: web_sys::Window) -> RafHost {
        RafHost { window, callback: Rc::new(RefCell::new(None)) }
    }

    pub fn callback(&self) -> FrameCallback {
        self.callback.clone()
    }
}

impl FrameHost for RafHost {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let cb = self.callback.borrow();
        let Some(cb) = cb.as_ref() else {
            log::warn!("frame requested before callback was installed");
            return None;
        };
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => Some(id),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::error!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}
