//! DOM drivers for the page widgets.
//!
//! The state machines live in `backdrop_core::page`; these functions only
//! wire them to elements and timers. Listeners are installed for the life
//! of the page.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use backdrop_core::page::{navbar_scrolled, ContactForm, FormView, Typewriter, TypewriterTimings};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, Window};

use crate::{to_js, Callback};

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn missing(what: &str) -> JsValue {
    JsValue::from_str(&format!("element not found: {what}"))
}

fn schedule(callback: &Closure<dyn FnMut()>, delay: Duration) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), ms)
    {
        warn!("backdrop: setTimeout failed: {e:?}");
    }
}

/// Types and deletes `phrases` in a loop inside `element_id`.
///
/// Without phrases, the default role list is used.
#[wasm_bindgen(js_name = startTypewriter)]
pub fn start_typewriter(element_id: &str, phrases: Option<Vec<String>>) -> Result<(), JsValue> {
    let element = document(&window()?)?
        .get_element_by_id(element_id)
        .ok_or_else(|| missing(element_id))?;
    let mut typewriter = match phrases {
        Some(phrases) => Typewriter::new(phrases, TypewriterTimings::default()).map_err(to_js)?,
        None => Typewriter::default(),
    };

    let tick: Callback = Rc::new(RefCell::new(None));
    let tick_self = tick.clone();
    // holds itself: the effect runs until the page goes away
    *tick.borrow_mut() = Some(Closure::new(move || {
        let frame = typewriter.tick();
        element.set_text_content(Some(&frame.text));
        if let Some(cb) = tick_self.borrow().as_ref() {
            schedule(cb, frame.delay);
        }
    }));
    if let Some(cb) = tick.borrow().as_ref() {
        schedule(cb, Duration::ZERO);
    }
    Ok(())
}

/// Toggles the `scrolled` class on the first element matching `selector`.
#[wasm_bindgen(js_name = bindNavbar)]
pub fn bind_navbar(selector: &str) -> Result<(), JsValue> {
    let window = window()?;
    let navbar = document(&window)?
        .query_selector(selector)?
        .ok_or_else(|| missing(selector))?;

    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        let scrolled = navbar_scrolled(window.scroll_y().unwrap_or(0.0));
        let _ = navbar.class_list().toggle_with_force("scrolled", scrolled);
    });
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}

#[derive(Clone)]
struct FormDom {
    form: HtmlFormElement,
    button: HtmlButtonElement,
    status: HtmlElement,
}

impl FormDom {
    fn apply(&self, view: &FormView) {
        self.button.set_text_content(Some(&view.button_label));
        let style = self.button.style();
        let _ = style.set_property("opacity", &view.button_opacity.to_string());
        let _ = match view.button_background {
            Some(color) => style.set_property("background", &color.to_css()),
            None => style.remove_property("background").map(drop),
        };

        self.status.set_text_content(Some(&view.status));
        let style = self.status.style();
        let _ = match view.status_color {
            Some(color) => style.set_property("color", &color.to_css()),
            None => style.remove_property("color").map(drop),
        };

        if view.reset_fields {
            self.form.reset();
        }
    }
}

/// Fakes submission of the form `form_id`, reporting in `status_id`.
#[wasm_bindgen(js_name = bindContactForm)]
pub fn bind_contact_form(form_id: &str, status_id: &str) -> Result<(), JsValue> {
    let document = document(&window()?)?;
    let form: HtmlFormElement = document
        .get_element_by_id(form_id)
        .ok_or_else(|| missing(form_id))?
        .dyn_into()?;
    let button: HtmlButtonElement = form
        .query_selector("button")?
        .ok_or_else(|| missing("button"))?
        .dyn_into()?;
    let status: HtmlElement = document
        .get_element_by_id(status_id)
        .ok_or_else(|| missing(status_id))?
        .dyn_into()?;

    let state = Rc::new(RefCell::new(ContactForm::new(
        button.text_content().unwrap_or_default(),
    )));
    let dom = FormDom {
        form: form.clone(),
        button,
        status,
    };

    let timer: Callback = Rc::new(RefCell::new(None));
    let (timer_state, timer_dom, timer_self) = (state.clone(), dom.clone(), timer.clone());
    *timer.borrow_mut() = Some(Closure::new(move || {
        let step = timer_state.borrow_mut().timer_fired();
        if let Some(step) = step {
            timer_dom.apply(&step.view);
            if let (Some(delay), Some(cb)) = (step.next_timer, timer_self.borrow().as_ref()) {
                schedule(cb, delay);
            }
        }
    }));

    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let step = state.borrow_mut().submit();
        if let Some(step) = step {
            dom.apply(&step.view);
            if let (Some(delay), Some(cb)) = (step.next_timer, timer.borrow().as_ref()) {
                schedule(cb, delay);
            }
        }
    });
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();
    Ok(())
}
