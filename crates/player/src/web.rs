//! Browser entrypoint and JS-callable exports.
//!
//! The sheet page is rendered by the server; this module only attaches the
//! form controller to it once the DOM is ready.

use charsheet_domain::{CharacterSheet, Pathfinder1eSystem};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::application::{adjust_value, FormController};
use crate::infrastructure::platform::{WebFormDocument, WebScheduler};
use crate::runner::config::ControllerConfig;

/// Install the panic hook and tracing, then attach to the page when the DOM
/// is ready.
pub fn boot() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        warn!("No document; form controller not attached");
        return;
    };

    if document.ready_state() == "loading" {
        let on_ready = Closure::<dyn FnMut()>::once(attach_to_page);
        if let Err(err) = document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        ) {
            warn!(error = ?err, "Failed to wait for DOMContentLoaded");
            return;
        }
        on_ready.forget();
    } else {
        attach_to_page();
    }
}

/// Read timing overrides from `<body data-*-ms>`; bad values are ignored.
fn page_config(document: &web_sys::Document) -> ControllerConfig {
    let Some(body) = document.body() else {
        return ControllerConfig::default();
    };
    ControllerConfig::from_lookup(|key| key.attribute(), |name| body.get_attribute(name))
        .unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring page timing overrides");
            ControllerConfig::default()
        })
}

fn attach_to_page() {
    let Some(document) = WebFormDocument::from_window() else {
        warn!("No document; form controller not attached");
        return;
    };
    let config = page_config(document.document());
    let controller = FormController::attach(document, WebScheduler, config);
    info!(?config, "Sheet page attached");
    // Lives as long as the page.
    std::mem::forget(controller);
}

/// `onclick="adjustValue('str_score', 1)"`
#[wasm_bindgen(js_name = adjustValue)]
pub fn adjust_value_js(field_id: &str, delta: i32) {
    let Some(document) = WebFormDocument::from_window() else {
        return;
    };
    adjust_value(&document, field_id, delta);
}

/// Derive the full Pathfinder statistics block for a sheet object.
#[wasm_bindgen(js_name = deriveSheet)]
pub fn derive_sheet_js(sheet: JsValue) -> Result<JsValue, JsValue> {
    let sheet: CharacterSheet = serde_wasm_bindgen::from_value(sheet)?;
    let derived = sheet.derive(&Pathfinder1eSystem::new());
    Ok(serde_wasm_bindgen::to_value(&derived)?)
}
