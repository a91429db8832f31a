//! The animated canvas backdrop as seen from JavaScript.
//!
//! Frames come from `requestAnimationFrame`; window resizes rebuild the
//! field. Closures hold the scene weakly, so dropping the [`Backdrop`]
//! releases everything.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use backdrop_core::{
    FieldConfig, FrameScheduler, ParticleField, SimulationLoop, Viewport, ViewportBinding,
    Xorshift64,
};
use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::canvas::CanvasSurface;
use crate::{to_js, Callback};

/// [`FrameScheduler`] backed by `window.requestAnimationFrame`.
pub struct AnimationFrameScheduler {
    callback: Callback,
    handle: Option<i32>,
}

impl AnimationFrameScheduler {
    pub fn new(callback: Callback) -> Self {
        Self {
            callback,
            handle: None,
        }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(cb) = self.callback.borrow().as_ref() {
            match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(handle) => self.handle = Some(handle),
                Err(e) => warn!("backdrop: requestAnimationFrame failed: {e:?}"),
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
    }
}

struct Scene {
    surface: CanvasSurface,
    field: ParticleField,
    binding: ViewportBinding<Xorshift64>,
    frame_loop: SimulationLoop<AnimationFrameScheduler>,
}

fn viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Fresh seed per page load.
fn random_seed() -> u64 {
    let bits = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
    bits ^ (js_sys::Date::now() as u64).rotate_left(32)
}

#[wasm_bindgen]
pub struct Backdrop {
    scene: Rc<RefCell<Scene>>,
    // keeps the frame closure alive; the scheduler holds another handle
    _animate: Callback,
    resize: Closure<dyn FnMut()>,
    listening: bool,
}

#[wasm_bindgen]
impl Backdrop {
    /// Sizes `canvas` to the window and seeds the first field.
    ///
    /// `params` is an optional JSON object of config overrides, e.g.
    /// `{"edge_policy": "bounce", "link_style": "loose"}`.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, params: Option<String>) -> Result<Backdrop, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let params: serde_json::Value = match params {
            Some(text) => serde_json::from_str(&text).map_err(to_js)?,
            None => serde_json::Value::Object(serde_json::Map::new()),
        };
        let config = FieldConfig::from_json(&params).map_err(to_js)?;

        let mut surface = CanvasSurface::new(canvas)?;
        let mut binding = ViewportBinding::new(Xorshift64::new(random_seed()));
        let field = binding.bind(viewport(&window), &mut surface, config);
        info!("backdrop: {} particles", field.len());

        let animate: Callback = Rc::new(RefCell::new(None));
        let scene = Rc::new(RefCell::new(Scene {
            surface,
            field,
            binding,
            frame_loop: SimulationLoop::new(AnimationFrameScheduler::new(animate.clone())),
        }));

        let frame_scene: Weak<RefCell<Scene>> = Rc::downgrade(&scene);
        *animate.borrow_mut() = Some(Closure::new(move || {
            let Some(rc) = frame_scene.upgrade() else {
                return;
            };
            let mut guard = rc.borrow_mut();
            let Scene {
                surface,
                field,
                frame_loop,
                ..
            } = &mut *guard;
            frame_loop.frame(field, surface);
        }));

        let resize_scene = Rc::downgrade(&scene);
        let resize = Closure::<dyn FnMut()>::new(move || {
            let (Some(rc), Some(window)) = (resize_scene.upgrade(), web_sys::window()) else {
                return;
            };
            let mut guard = rc.borrow_mut();
            let Scene {
                surface,
                field,
                binding,
                ..
            } = &mut *guard;
            binding.on_resize(viewport(&window), surface, field);
        });

        Ok(Backdrop {
            scene,
            _animate: animate,
            resize,
            listening: false,
        })
    }

    /// Starts animating and tracking window resizes.
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.scene.borrow_mut().frame_loop.start().map_err(to_js)?;
        if !self.listening {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            window.add_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref())?;
            self.listening = true;
        }
        Ok(())
    }

    /// Stops animating. The last frame stays on the canvas.
    pub fn stop(&mut self) {
        self.scene.borrow_mut().frame_loop.cancel();
        if self.listening {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .remove_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
            }
            self.listening = false;
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.scene.borrow().frame_loop.is_running()
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.scene.borrow().field.len()
    }

    /// Frames rendered since construction.
    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.scene.borrow().frame_loop.frames() as f64
    }

    /// Field rebuilds so far, including the initial one.
    #[wasm_bindgen(getter)]
    pub fn rebuilds(&self) -> f64 {
        self.scene.borrow().binding.rebuilds() as f64
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.stop();
    }
}
