//! Browser platform implementations
//!
//! Provides the form document and scheduler on top of `web-sys`. Listeners
//! are registered for the lifetime of the page.

use gloo_timers::callback::Timeout;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement};

use crate::ports::outbound::{
    DeferredTask, FormDocument, Listener, RowPart, Scheduler, SkillRowElement,
    ROW_ABILITY_ATTRIBUTE, SKILL_ROW_CLASS,
};

fn add_listener(target: &EventTarget, event: &str, listener: Listener) {
    let closure = Closure::<dyn Fn()>::new(move || listener());
    if let Err(err) =
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        warn!(event, error = ?err, "Failed to add event listener");
        return;
    }
    // Page-lifetime listener; never removed.
    closure.forget();
}

fn dispatch(target: &EventTarget, event: &str) {
    match Event::new(event) {
        Ok(event) => {
            if let Err(err) = target.dispatch_event(&event) {
                warn!(error = ?err, "Event dispatch failed");
            }
        }
        Err(err) => warn!(event, error = ?err, "Failed to create event"),
    }
}

/// The live sheet page.
#[derive(Clone)]
pub struct WebFormDocument {
    document: Document,
}

impl WebFormDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the current window, if any.
    pub fn from_window() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn input(&self, id: &str) -> Option<HtmlInputElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }
}

impl FormDocument for WebFormDocument {
    type Row = WebSkillRow;

    fn field_value(&self, id: &str) -> Option<String> {
        self.input(id).map(|input| input.value())
    }

    fn set_field_value(&self, id: &str, value: &str) -> bool {
        match self.input(id) {
            Some(input) => {
                input.set_value(value);
                true
            }
            None => false,
        }
    }

    fn dispatch_change(&self, id: &str) {
        if let Some(input) = self.input(id) {
            dispatch(&input, "change");
        }
    }

    fn on_field_change(&self, id: &str, listener: Listener) -> bool {
        match self.input(id) {
            Some(input) => {
                add_listener(&input, "change", listener);
                true
            }
            None => false,
        }
    }

    fn skill_rows(&self) -> Vec<WebSkillRow> {
        let Ok(nodes) = self
            .document
            .query_selector_all(&format!(".{}", SKILL_ROW_CLASS))
        else {
            return Vec::new();
        };

        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| WebSkillRow { element })
            .collect()
    }
}

/// One `.skill-row` element on the live page.
#[derive(Clone)]
pub struct WebSkillRow {
    element: Element,
}

impl WebSkillRow {
    fn part(&self, part: RowPart) -> Option<HtmlInputElement> {
        self.element
            .query_selector(&format!(".{}", part.class_name()))
            .ok()
            .flatten()?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }
}

impl SkillRowElement for WebSkillRow {
    fn ability_code(&self) -> Option<String> {
        self.element.get_attribute(ROW_ABILITY_ATTRIBUTE)
    }

    fn part_value(&self, part: RowPart) -> Option<String> {
        self.part(part).map(|input| input.value())
    }

    fn set_part_value(&self, part: RowPart, value: &str) -> bool {
        match self.part(part) {
            Some(input) => {
                input.set_value(value);
                true
            }
            None => false,
        }
    }

    fn is_checked(&self, part: RowPart) -> bool {
        self.part(part).is_some_and(|input| input.checked())
    }

    fn on_edit(&self, listener: Listener) {
        let Ok(inputs) = self.element.query_selector_all("input") else {
            return;
        };
        for node in (0..inputs.length()).filter_map(|index| inputs.item(index)) {
            add_listener(&node, "input", listener.clone());
            add_listener(&node, "change", listener.clone());
        }
    }
}

/// `setTimeout`-backed scheduler.
#[derive(Clone, Copy, Default)]
pub struct WebScheduler;

impl Scheduler for WebScheduler {
    fn defer(&self, delay_ms: u32, task: DeferredTask) {
        // Fire-and-forget; the timer owns the task until it runs.
        Timeout::new(delay_ms, task).forget();
    }
}
