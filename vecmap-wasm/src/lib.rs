use wasm_bindgen::prelude::*;
mod api;
mod canvas;
mod error;
mod frame;
mod interop;

pub use api::MapView;

/// Install the panic hook (when enabled) and route `log` output to the
/// browser console. Safe to call more than once.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
