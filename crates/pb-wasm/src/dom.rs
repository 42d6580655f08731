//! Thin web-sys layer: lookups, measurement, and per-zone reconciliation.
//!
//! Nothing here owns state. The `PageBuilder` bridge decides *what* changed;
//! these helpers make the live DOM agree with it.

use pb_core::BuilderError;
use pb_core::config::UiIds;
use pb_core::id::ElementId;
use pb_core::model::{PageGraph, ResolvedBounds};
use pb_core::render::{RenderState, element_class, render_content};
use pb_editor::{FormField, FormValues, PropertiesForm};
use std::collections::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlFormElement};

const WRAPPER_SELECTOR: &str = ":scope > .canvas-element";

fn host(err: JsValue) -> BuilderError {
    BuilderError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

pub(crate) fn document() -> Result<Document, BuilderError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| BuilderError::MissingUiElement("document".into()))
}

pub(crate) fn require(doc: &Document, id: &str) -> Result<Element, BuilderError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| BuilderError::MissingUiElement(id.to_string()))
}

/// Every element whose absence should stop the builder from starting.
pub(crate) fn check_required(doc: &Document, ui: &UiIds) -> Result<(), BuilderError> {
    for id in ui.required() {
        require(doc, id)?;
    }
    Ok(())
}

pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

// ─── Measurement ─────────────────────────────────────────────────────────

/// Viewport rects of the element wrappers currently inside `zone`.
///
/// Wrappers whose `data-id` the page has never seen are skipped.
pub(crate) fn measure_zone(
    doc: &Document,
    zone: ElementId,
) -> Result<Vec<(ElementId, ResolvedBounds)>, BuilderError> {
    let zone_el = require(doc, zone.as_str())?;
    let mut out = Vec::new();
    for wrapper in wrappers(&zone_el)? {
        let Some(id) = wrapper
            .get_attribute("data-id")
            .and_then(|raw| ElementId::lookup(&raw))
        else {
            continue;
        };
        let rect = wrapper.get_bounding_client_rect();
        out.push((
            id,
            ResolvedBounds {
                x: rect.left() as f32,
                y: rect.top() as f32,
                width: rect.width() as f32,
                height: rect.height() as f32,
            },
        ));
    }
    Ok(out)
}

fn wrappers(zone_el: &Element) -> Result<Vec<Element>, BuilderError> {
    let list = zone_el.query_selector_all(WRAPPER_SELECTOR).map_err(host)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

// ─── Reconciliation ──────────────────────────────────────────────────────

/// Make the wrappers inside `zone` match the page model, in order.
///
/// Existing wrappers are reused and moved rather than rebuilt, so a node in
/// the middle of a native drag keeps its identity.
pub(crate) fn reconcile_zone(
    doc: &Document,
    page: &PageGraph,
    zone: ElementId,
    state: RenderState,
) -> Result<(), BuilderError> {
    let zone_el = require(doc, zone.as_str())?;

    let mut existing: HashMap<String, Element> = HashMap::new();
    for wrapper in wrappers(&zone_el)? {
        if let Some(id) = wrapper.get_attribute("data-id") {
            existing.insert(id, wrapper);
        }
    }

    for id in page.element_ids(zone) {
        let Some(element) = page.element(id) else {
            continue;
        };
        let wrapper = match existing.remove(id.as_str()) {
            Some(wrapper) => wrapper,
            None => {
                let wrapper = doc.create_element("div").map_err(host)?;
                wrapper.set_attribute("draggable", "true").map_err(host)?;
                wrapper.set_attribute("data-id", id.as_str()).map_err(host)?;
                wrapper
                    .set_attribute("data-type", element.kind().tag())
                    .map_err(host)?;
                wrapper
            }
        };

        wrapper.set_class_name(&element_class(id, state));
        let content = render_content(element);
        if wrapper.inner_html() != content {
            wrapper.set_inner_html(&content);
        }
        zone_el.append_child(&wrapper).map_err(host)?;
    }

    for (id, stale) in existing {
        log::debug!("Removing stale wrapper {id}");
        stale.remove();
    }
    Ok(())
}

pub(crate) fn set_highlight(
    doc: &Document,
    zone: ElementId,
    on: bool,
) -> Result<(), BuilderError> {
    let zone_el = require(doc, zone.as_str())?;
    zone_el
        .class_list()
        .toggle_with_force("highlight", on)
        .map_err(host)?;
    Ok(())
}

// ─── Properties form ─────────────────────────────────────────────────────

fn field(doc: &Document, id: &str) -> Result<Element, BuilderError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| BuilderError::MissingFormField(id.to_string()))
}

fn field_ids(ui: &UiIds) -> [&str; 3] {
    [&ui.content_field, &ui.color_field, &ui.size_field]
}

/// Copy the form projection into the DOM inputs.
///
/// All three inputs are looked up before any is written, so a missing one
/// leaves the form untouched.
pub(crate) fn write_form(
    doc: &Document,
    ui: &UiIds,
    form: &PropertiesForm,
) -> Result<(), BuilderError> {
    let [content, color, size] = field_ids(ui).map(|id| field(doc, id));
    let inputs = [
        (content?, &form.content),
        (color?, &form.color),
        (size?, &form.size),
    ];

    for (input, state) in inputs {
        write_field(&input, state)?;
    }
    Ok(())
}

fn write_field(input: &Element, state: &FormField) -> Result<(), BuilderError> {
    js_sys::Reflect::set(input, &"value".into(), &state.value.as_str().into()).map_err(host)?;
    if let Some(html) = input.dyn_ref::<HtmlElement>() {
        let display = if state.visible { "block" } else { "none" };
        html.style().set_property("display", display).map_err(host)?;
    }
    Ok(())
}

/// Read the three inputs back as submitted values.
pub(crate) fn read_form(doc: &Document, ui: &UiIds) -> Result<FormValues, BuilderError> {
    let [content, color, size] = field_ids(ui).map(|id| field(doc, id));
    Ok(FormValues {
        content: input_value(&content?),
        color: input_value(&color?),
        size: input_value(&size?),
    })
}

fn input_value(input: &Element) -> Option<String> {
    js_sys::Reflect::get(input, &"value".into())
        .ok()
        .and_then(|v| v.as_string())
        .filter(|v| !v.is_empty())
}

/// Restore the host form to its authored defaults.
pub(crate) fn reset_form(doc: &Document, ui: &UiIds) -> Result<(), BuilderError> {
    let form = require(doc, &ui.form)?;
    if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
        form.reset();
    }
    Ok(())
}
