//! WASM bridge for the page builder: exposes the editor to browser JS.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the event
//! listeners and forwards each gesture here; after every change the bridge
//! patches the affected drop zones and the properties form in place.

mod dom;

use pb_core::BuilderError;
use pb_core::config::{BuilderConfig, UiIds};
use pb_core::id::ElementId;
use pb_editor::{
    CanvasEditor, ClickTarget, FormField, FormValues, InputEvent, PropertiesForm, Response,
};
use serde_json::json;
use wasm_bindgen::prelude::*;

const INIT_FAILED: &str =
    "An error occurred while initializing the page. Please check the console for details.";

/// How the builder relates to the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MountState {
    /// Not attached to the DOM. Pointer Y is taken in layout coordinates and
    /// markup is pulled by the host via `render_zone`.
    Detached,
    /// Host UI verified; the bridge patches the DOM after every change.
    Mounted,
    /// `mount` found the host UI incomplete. Every gesture is refused.
    Failed,
}

/// The browser-facing page builder.
///
/// One instance per page. It holds the editor plus the DOM bookkeeping
/// needed to keep the host markup in step with it.
#[wasm_bindgen]
pub struct PageBuilder {
    editor: CanvasEditor,
    ui: UiIds,
    zones: Vec<ElementId>,
    state: MountState,
    /// Form projection last written to the DOM.
    shown_form: Option<PropertiesForm>,
}

#[wasm_bindgen]
impl PageBuilder {
    /// Create a builder from a JSON `BuilderConfig`. Empty input means defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<PageBuilder, JsValue> {
        console_error_panic_hook_setup();
        init_logging();

        let config = parse_config(config_json).map_err(to_js)?;
        let editor = CanvasEditor::from_config(&config).map_err(to_js)?;
        let zones = editor.page().zones();
        log::info!("Page builder ready with {} drop zone(s)", zones.len());

        Ok(Self {
            editor,
            ui: config.ui,
            zones,
            state: MountState::Detached,
            shown_form: None,
        })
    }

    /// Verify the host UI and render every zone.
    ///
    /// A missing properties form or delete button is fatal: the error is
    /// logged, the user is alerted, the call returns `Err`, and the builder
    /// ignores every later gesture.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        let checked = dom::document().and_then(|doc| dom::check_required(&doc, &self.ui));
        self.finish_mount(checked).map_err(|e| {
            dom::alert(INIT_FAILED);
            to_js(e)
        })
    }

    // ─── Drag & drop ─────────────────────────────────────────────────────

    /// A palette entry started dragging, carrying its `data-type`.
    pub fn drag_start_palette(&mut self, tag: &str) -> bool {
        if self.halted() {
            return false;
        }
        let changed = self.editor.drag_start_palette(tag);
        self.flush_if(changed)
    }

    /// A canvas element started dragging.
    pub fn drag_start_element(&mut self, id: &str) -> bool {
        if self.halted() {
            return false;
        }
        let Some(id) = lookup_element(id) else {
            return false;
        };
        let changed = self.editor.drag_start_element(id);
        self.flush_if(changed)
    }

    /// Pointer moved over a drop zone.
    ///
    /// Once mounted, `y` is the event's `clientY` and is compared against the
    /// wrappers' on-screen rects. Before `mount` it is in layout coordinates,
    /// the same space as the bounds `resolve_layout` computes.
    ///
    /// Returns JSON: `{"changed":bool,"dropEffect":"copy"|"move"|null,"created":null}`.
    pub fn drag_over(&mut self, zone: &str, y: f32) -> String {
        if self.halted() {
            return response_json(&Response::default());
        }
        let Some(zone) = lookup_zone(zone) else {
            return response_json(&Response::default());
        };
        if self.state == MountState::Mounted && self.editor.dragging().is_some() {
            let measured = self.measure(zone);
            report("Error in drag sorting", measured);
        }
        let resp = self.editor.drag_over(zone, y);
        self.flush_if(resp.changed);
        response_json(&resp)
    }

    pub fn drag_leave(&mut self, zone: &str) -> bool {
        if self.halted() {
            return false;
        }
        let Some(zone) = lookup_zone(zone) else {
            return false;
        };
        let changed = self.editor.drag_leave(zone);
        self.flush_if(changed)
    }

    /// Something was dropped on a zone.
    ///
    /// Returns JSON in the same shape as `drag_over`; `created` holds the new
    /// element's ID for palette drops.
    pub fn drop_on(&mut self, zone: &str) -> String {
        if self.halted() {
            return response_json(&Response::default());
        }
        let Some(zone) = lookup_zone(zone) else {
            return response_json(&Response::default());
        };
        let resp = self.editor.handle(InputEvent::Drop { zone });
        self.flush_if(resp.changed);
        response_json(&resp)
    }

    pub fn drag_end(&mut self) -> bool {
        if self.halted() {
            return false;
        }
        let changed = self.editor.drag_end();
        if changed {
            self.editor.engine.clear_measured_bounds();
        }
        self.flush_if(changed)
    }

    // ─── Selection & properties ──────────────────────────────────────────

    /// A click landed inside element `id`; `target_tag` is the `tagName` of
    /// the innermost clicked node.
    pub fn click(&mut self, id: &str, target_tag: &str) -> bool {
        if self.halted() {
            return false;
        }
        let Some(id) = lookup_element(id) else {
            return false;
        };
        let changed = self
            .editor
            .click(id, ClickTarget::from_tag_name(target_tag));
        self.flush_if(changed)
    }

    /// Read the properties form from the DOM and apply it to the selection.
    pub fn submit(&mut self) -> bool {
        if self.halted() {
            return false;
        }
        let values = dom::document().and_then(|doc| dom::read_form(&doc, &self.ui));
        let Some(values) = report("Error applying properties", values) else {
            return false;
        };
        self.apply(&values)
    }

    /// Apply explicit form values, for hosts that read the form themselves.
    pub fn submit_values(
        &mut self,
        content: Option<String>,
        color: Option<String>,
        size: Option<String>,
    ) -> bool {
        self.apply(&FormValues {
            content,
            color,
            size,
        })
    }

    /// Delete the selected element and reset the properties form.
    pub fn delete_selected(&mut self) -> bool {
        if self.halted() {
            return false;
        }
        let changed = self.editor.delete_selected();
        if changed && self.state == MountState::Mounted {
            let reset = dom::document().and_then(|doc| dom::reset_form(&doc, &self.ui));
            report("Error deleting element", reset);
            self.shown_form = Some(self.editor.form().clone());
        }
        self.flush_if(changed)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// ID of the selected element, or empty.
    pub fn get_selected_id(&self) -> String {
        self.editor
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Form projection as JSON:
    /// `{"content":{"value":..,"visible":..},"color":{..},"size":{..}}`.
    pub fn get_form_json(&self) -> String {
        form_json(self.editor.form())
    }

    /// Element IDs of `zone`, in order, as a JSON array.
    pub fn get_zone_json(&self, zone: &str) -> String {
        let elements = lookup_zone(zone)
            .map(|zone| self.editor.page().element_ids(zone))
            .unwrap_or_default();
        let ids: Vec<&str> = elements.iter().map(|id| id.as_str()).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// Markup for one zone. Hosts that don't `mount` can use this directly.
    pub fn render_zone(&self, zone: &str) -> String {
        lookup_zone(zone)
            .map(|zone| self.editor.render_zone(zone))
            .unwrap_or_default()
    }

    /// Drain the zones whose markup is stale, as a JSON array of IDs.
    pub fn take_dirty_zones_json(&mut self) -> String {
        let zones: Vec<String> = self
            .editor
            .engine
            .take_dirty_zones()
            .into_iter()
            .map(|z| z.as_str().to_string())
            .collect();
        serde_json::to_string(&zones).unwrap_or_else(|_| "[]".to_string())
    }
}

// ─── Internal (not exported) ─────────────────────────────────────────────

impl PageBuilder {
    /// Record the outcome of the host UI check. On success every zone is
    /// rendered; on failure the builder stops accepting gestures.
    fn finish_mount(&mut self, checked: Result<(), BuilderError>) -> Result<(), BuilderError> {
        if let Err(e) = checked {
            log::error!("Initialization error: {e}");
            self.state = MountState::Failed;
            return Err(e);
        }

        self.state = MountState::Mounted;
        for &zone in &self.zones {
            self.editor.engine.touch_zone(zone);
        }
        self.flush();
        Ok(())
    }

    /// True once a failed `mount` has taken the builder out of service.
    fn halted(&self) -> bool {
        if self.state == MountState::Failed {
            log::debug!("page builder failed to initialize; gesture ignored");
            return true;
        }
        false
    }

    fn apply(&mut self, values: &FormValues) -> bool {
        if self.halted() {
            return false;
        }
        let changed = self.editor.apply_properties(values);
        self.flush_if(changed)
    }

    /// Replace computed bounds of `zone`'s elements with their on-screen rects.
    fn measure(&mut self, zone: ElementId) -> Result<(), BuilderError> {
        let doc = dom::document()?;
        for (id, bounds) in dom::measure_zone(&doc, zone)? {
            self.editor.engine.set_measured_bounds(id, bounds);
        }
        Ok(())
    }

    fn flush_if(&mut self, changed: bool) -> bool {
        if changed {
            self.flush();
        }
        changed
    }

    /// Push pending model changes to the DOM. No-op unless mounted.
    fn flush(&mut self) {
        if self.state != MountState::Mounted {
            return;
        }
        let doc = match dom::document() {
            Ok(doc) => doc,
            Err(e) => {
                log::error!("DOM sync failed: {e}");
                return;
            }
        };

        let state = self.editor.render_state();
        for zone in self.editor.engine.take_dirty_zones() {
            let patched = dom::reconcile_zone(&doc, self.editor.page(), zone, state);
            report("Error rendering zone", patched);
        }
        for &zone in &self.zones {
            let toggled = dom::set_highlight(&doc, zone, self.editor.is_highlighted(zone));
            report("Error highlighting zone", toggled);
        }

        let form = self.editor.form();
        if self.shown_form.as_ref() != Some(form) {
            self.shown_form = Some(form.clone());
            let written = dom::write_form(&doc, &self.ui, form);
            report("Error updating properties form", written);
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn parse_config(json: &str) -> Result<BuilderConfig, BuilderError> {
    if json.trim().is_empty() {
        return Ok(BuilderConfig::default());
    }
    let config: BuilderConfig =
        serde_json::from_str(json).map_err(|e| BuilderError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

fn lookup_zone(raw: &str) -> Option<ElementId> {
    let id = ElementId::lookup(raw);
    if id.is_none() {
        log::warn!("{}", BuilderError::UnknownZone(raw.to_string()));
    }
    id
}

fn lookup_element(raw: &str) -> Option<ElementId> {
    let id = ElementId::lookup(raw);
    if id.is_none() {
        log::warn!("{}", BuilderError::UnknownElement(raw.to_string()));
    }
    id
}

/// Log a failed bridge step and carry on.
fn report<T>(context: &str, result: Result<T, BuilderError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("{context}: {e}");
            None
        }
    }
}

fn to_js(err: BuilderError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn response_json(resp: &Response) -> String {
    json!({
        "changed": resp.changed,
        "dropEffect": resp.drop_effect.map(|e| e.as_str()),
        "created": resp.created.map(|id| id.as_str().to_string()),
    })
    .to_string()
}

fn form_json(form: &PropertiesForm) -> String {
    let field = |f: &FormField| json!({ "value": f.value, "visible": f.visible });
    json!({
        "content": field(&form.content),
        "color": field(&form.color),
        "size": field(&form.size),
    })
    .to_string()
}

fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
        });
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Page builder panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_editor::DropEffect;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_means_defaults() {
        assert_eq!(parse_config("").unwrap(), BuilderConfig::default());
        assert_eq!(parse_config("  \n").unwrap(), BuilderConfig::default());
    }

    #[test]
    fn config_json_overrides_zones_and_ui() {
        let config = parse_config(r#"{"zones":["hero","body"],"ui":{"form":"props"}}"#).unwrap();
        assert_eq!(config.zones, vec!["hero", "body"]);
        assert_eq!(config.ui.form, "props");
        assert_eq!(config.ui.delete_button, "delete-element");
    }

    #[test]
    fn bad_config_is_rejected() {
        assert!(matches!(
            parse_config("{not json"),
            Err(BuilderError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_config(r#"{"zones":[]}"#),
            Err(BuilderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn response_json_shape() {
        let resp = Response {
            changed: true,
            drop_effect: Some(DropEffect::Move),
            created: None,
        };
        let value: serde_json::Value = serde_json::from_str(&response_json(&resp)).unwrap();
        assert_eq!(
            value,
            json!({ "changed": true, "dropEffect": "move", "created": null })
        );

        let created = Response {
            changed: true,
            drop_effect: None,
            created: Some(ElementId::intern("wasm_text_1")),
        };
        let value: serde_json::Value = serde_json::from_str(&response_json(&created)).unwrap();
        assert_eq!(value["created"], "wasm_text_1");
        assert_eq!(value["dropEffect"], serde_json::Value::Null);
    }

    #[test]
    fn form_json_carries_visibility() {
        let mut form = PropertiesForm::default();
        form.color.visible = false;
        form.size.value = "large".into();

        let value: serde_json::Value = serde_json::from_str(&form_json(&form)).unwrap();
        assert_eq!(value["color"]["visible"], false);
        assert_eq!(value["size"]["value"], "large");
        assert_eq!(value["content"]["visible"], true);
    }

    #[test]
    fn unknown_ids_are_not_interned() {
        assert_eq!(lookup_zone("wasm_never_seen_zone"), None);
        assert_eq!(ElementId::lookup("wasm_never_seen_zone"), None);
    }

    #[test]
    fn failed_mount_refuses_every_gesture() {
        let mut builder = PageBuilder::new(r#"{"zones":["wasm_halted"]}"#).unwrap();
        let err = builder
            .finish_mount(Err(BuilderError::MissingUiElement("delete-element".into())))
            .unwrap_err();
        assert!(err.is_fatal());

        assert!(!builder.drag_start_palette("text"));
        let over: serde_json::Value =
            serde_json::from_str(&builder.drag_over("wasm_halted", 0.0)).unwrap();
        assert_eq!(over["changed"], false);
        let dropped: serde_json::Value =
            serde_json::from_str(&builder.drop_on("wasm_halted")).unwrap();
        assert_eq!(dropped["created"], serde_json::Value::Null);
        assert!(!builder.drag_end());
        assert!(!builder.submit_values(Some("x".into()), None, None));
        assert!(!builder.delete_selected());

        assert_eq!(builder.get_zone_json("wasm_halted"), "[]");
        assert_eq!(builder.get_selected_id(), "");
    }

    #[test]
    fn drop_response_reflects_what_happened() {
        let mut builder = PageBuilder::new(r#"{"zones":["wasm_drops"]}"#).unwrap();

        let idle: serde_json::Value =
            serde_json::from_str(&builder.drop_on("wasm_drops")).unwrap();
        assert_eq!(idle, json!({ "changed": false, "dropEffect": null, "created": null }));

        builder.drag_start_palette("video");
        let unknown: serde_json::Value =
            serde_json::from_str(&builder.drop_on("wasm_drops")).unwrap();
        assert_eq!(unknown["changed"], false);
        assert_eq!(builder.get_zone_json("wasm_drops"), "[]");
    }

    #[test]
    fn detached_reorder_uses_layout_coordinates() {
        let mut builder = PageBuilder::new(r#"{"zones":["wasm_layout"]}"#).unwrap();
        let mut ids = Vec::new();
        for _ in 0..2 {
            builder.drag_start_palette("divider");
            let resp: serde_json::Value =
                serde_json::from_str(&builder.drop_on("wasm_layout")).unwrap();
            ids.push(resp["created"].as_str().unwrap().to_string());
            builder.drag_end();
        }

        // Above the first divider's computed midpoint.
        assert!(builder.drag_start_element(&ids[1]));
        builder.drag_over("wasm_layout", 0.0);
        builder.drag_end();

        let order: Vec<String> =
            serde_json::from_str(&builder.get_zone_json("wasm_layout")).unwrap();
        assert_eq!(order, vec![ids[1].clone(), ids[0].clone()]);
    }

    #[test]
    fn builder_works_without_mount() {
        let mut builder = PageBuilder::new(r#"{"zones":["wasm_canvas"]}"#).unwrap();
        builder.drag_start_palette("text");
        let resp: serde_json::Value =
            serde_json::from_str(&builder.drop_on("wasm_canvas")).unwrap();
        let created = resp["created"].as_str().unwrap().to_string();
        builder.drag_end();

        assert_eq!(builder.get_selected_id(), created);
        assert!(builder.render_zone("wasm_canvas").contains("New Text Block"));
        assert_eq!(builder.take_dirty_zones_json(), r#"["wasm_canvas"]"#);

        assert!(builder.submit_values(Some("Hello".into()), None, Some("small".into())));
        assert!(builder.render_zone("wasm_canvas").contains("font-size:14px"));

        assert!(builder.delete_selected());
        assert_eq!(builder.get_zone_json("wasm_canvas"), "[]");
        assert_eq!(builder.get_selected_id(), "");
    }
}
