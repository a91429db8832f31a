#![deny(unsafe_code)]
//! Browser bindings for the particle backdrop and page widgets.
//!
//! ```js
//! const backdrop = new Backdrop(document.getElementById("bg-canvas"));
//! backdrop.start();
//! startTypewriter("role-text");
//! bindNavbar(".navbar");
//! bindContactForm("contactForm", "formStatus");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, Level};
use wasm_bindgen::prelude::*;

mod backdrop;
mod canvas;
mod page;

pub use backdrop::{AnimationFrameScheduler, Backdrop};
pub use canvas::CanvasSurface;
pub use page::{bind_contact_form, bind_navbar, start_typewriter};

/// A JS callback slot that the callback itself can re-arm.
pub(crate) type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub(crate) fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Initialize logging and panic hooks. Runs when the module loads.
#[wasm_bindgen(start)]
pub fn init_logging() {
    let _ = console_log::init_with_level(Level::Info);
    console_error_panic_hook::set_once();
    info!("backdrop: logging initialized");
}
