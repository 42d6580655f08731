//! Canvas editor: gesture handling, selection, and property sync.
//!
//! All state that the page builder mutates between events (the selection,
//! the staged drag, the highlighted zones) lives on one `CanvasEditor`.
//! Every handler runs to completion synchronously. A handler that can't
//! proceed logs why and leaves the editor unchanged.
//!
//! | Event | Effect |
//! |-------|--------|
//! | drag-start (palette) | stage the entry's type tag |
//! | drag-start (element) | stage the element, mark it dragging |
//! | drag-over | highlight zone; live-reorder a staged element within its own zone |
//! | drag-leave | remove highlight |
//! | drop | palette: create, append, select. element: nothing to do |
//! | drag-end | clear staging and dragging marker |
//! | click | select unless the click hit interactive content |
//! | submit | write form values to the selected element |
//! | delete | remove the selected element, clear selection and form |

use crate::form::{FormValues, PropertiesForm};
use crate::input::{ClickTarget, DragSource, DropEffect, InputEvent};
use crate::selection::Selection;
use crate::sync::{PageMutation, SyncEngine};
use pb_core::catalog::{apply_size, create_element};
use pb_core::error::BuilderError;
use pb_core::id::ElementId;
use pb_core::model::*;
use pb_core::placement::{Placement, drag_after_element};
use pb_core::render::{RenderState, render_zone};
use pb_core::{BuilderConfig, LayoutConfig};
use smallvec::SmallVec;

/// The drag currently in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    /// A palette entry; the tag is validated when the drop creates the element.
    Palette { tag: String },
    /// An element already on the canvas.
    Element { id: ElementId },
}

impl DragState {
    pub fn effect(&self) -> DropEffect {
        match self {
            Self::Palette { .. } => DropEffect::Copy,
            Self::Element { .. } => DropEffect::Move,
        }
    }
}

/// Result of handling one input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Response {
    /// The page model or a visual marker changed; dirty zones need re-render.
    pub changed: bool,
    /// Drop effect to report for drag-over events.
    pub drop_effect: Option<DropEffect>,
    /// Element created by a drop.
    pub created: Option<ElementId>,
}

impl Response {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            ..Self::default()
        }
    }
}

pub struct CanvasEditor {
    pub engine: SyncEngine,
    selection: Selection,
    form: PropertiesForm,
    drag: Option<DragState>,
    highlighted: SmallVec<[ElementId; 2]>,
}

impl CanvasEditor {
    /// Create an editor with the given drop zones.
    pub fn new<'a>(zones: impl IntoIterator<Item = &'a str>, layout: LayoutConfig) -> Self {
        Self {
            engine: SyncEngine::new(zones, layout),
            selection: Selection::new(),
            form: PropertiesForm::default(),
            drag: None,
            highlighted: SmallVec::new(),
        }
    }

    /// Create an editor from a validated config.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the zone list is empty or has duplicates.
    pub fn from_config(config: &BuilderConfig) -> Result<Self, BuilderError> {
        config.validate()?;
        Ok(Self::new(
            config.zones.iter().map(String::as_str),
            config.layout,
        ))
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Route one input event to its handler.
    pub fn handle(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::DragStart(DragSource::Palette { tag }) => {
                Response::changed(self.drag_start_palette(&tag))
            }
            InputEvent::DragStart(DragSource::Element(id)) => {
                Response::changed(self.drag_start_element(id))
            }
            InputEvent::DragOver { zone, y } => self.drag_over(zone, y),
            InputEvent::DragLeave { zone } => Response::changed(self.drag_leave(zone)),
            InputEvent::Drop { zone } => {
                let had_highlight = self.is_highlighted(zone);
                let created = self.drop_on(zone);
                Response {
                    changed: had_highlight || created.is_some(),
                    drop_effect: None,
                    created,
                }
            }
            InputEvent::DragEnd => Response::changed(self.drag_end()),
            InputEvent::Click { element, target } => Response::changed(self.click(element, target)),
            InputEvent::Submit(values) => Response::changed(self.apply_properties(&values)),
            InputEvent::Delete => Response::changed(self.delete_selected()),
        }
    }

    // ─── Drag & drop ─────────────────────────────────────────────────────

    /// Stage a palette entry. A missing tag is reported and nothing is staged.
    pub fn drag_start_palette(&mut self, tag: &str) -> bool {
        if tag.is_empty() {
            log::error!("{}", BuilderError::MissingTypeTag);
            return false;
        }
        self.drag = Some(DragState::Palette {
            tag: tag.to_string(),
        });
        false
    }

    /// Stage an existing element for in-zone reordering.
    pub fn drag_start_element(&mut self, id: ElementId) -> bool {
        let Some(zone) = self.engine.page.zone_of(id) else {
            log::warn!("drag start: {}", BuilderError::UnknownElement(id.to_string()));
            return false;
        };
        self.drag = Some(DragState::Element { id });
        self.engine.touch_zone(zone);
        true
    }

    /// Pointer over `zone` at page Y `y`.
    ///
    /// Highlights the zone and, when the staged drag is an element that
    /// already lives in this zone, moves it to the computed placement.
    pub fn drag_over(&mut self, zone: ElementId, y: f32) -> Response {
        if self.engine.page.zone_index(zone).is_none() {
            log::warn!("drag over: {}", BuilderError::UnknownZone(zone.to_string()));
            return Response::default();
        }

        let mut changed = false;
        if !self.highlighted.contains(&zone) {
            self.highlighted.push(zone);
            changed = true;
        }

        let drop_effect = Some(self.drag.as_ref().map_or(DropEffect::Copy, DragState::effect));

        if let Some(DragState::Element { id }) = self.drag {
            changed |= self.reorder_within(zone, id, y);
        }

        Response {
            changed,
            drop_effect,
            created: None,
        }
    }

    /// Live reorder of `dragged` inside `zone`. No-op unless `zone` owns it.
    fn reorder_within(&mut self, zone: ElementId, dragged: ElementId, y: f32) -> bool {
        if self.engine.page.zone_of(dragged) != Some(zone) {
            return false;
        }
        let siblings = self.engine.zone_elements_with_bounds(zone);
        let placement = drag_after_element(siblings, dragged, y);
        let mutation = PageMutation::MoveElement {
            id: dragged,
            before: placement.anchor(),
        };
        match self.engine.apply_mutation(mutation) {
            Ok(changed) => {
                if changed && placement == Placement::Append {
                    log::trace!("reorder: {dragged} appended to {zone}");
                }
                changed
            }
            Err(e) => {
                log::error!("Error in drag sorting: {e}");
                false
            }
        }
    }

    pub fn drag_leave(&mut self, zone: ElementId) -> bool {
        let before = self.highlighted.len();
        self.highlighted.retain(|z| *z != zone);
        before != self.highlighted.len()
    }

    /// Drop on `zone`. Palette drags create a new element at the end of the
    /// zone and select it. Element drags were already placed by drag-over.
    /// Returns the created element, if any.
    pub fn drop_on(&mut self, zone: ElementId) -> Option<ElementId> {
        self.drag_leave(zone);

        let Some(drag) = self.drag.take() else {
            log::warn!("No dragged item available");
            return None;
        };

        match drag {
            DragState::Palette { tag } => {
                let mut element = match create_element(&tag) {
                    Ok(element) => element,
                    Err(e) => {
                        log::error!("Error creating element: {e}");
                        return None;
                    }
                };
                // Generated IDs can collide with names the host chose itself.
                while self.engine.page.index_of(element.id).is_some() {
                    element.id = ElementId::with_prefix(element.kind().tag());
                }
                let id = element.id;
                let mutation = PageMutation::AddElement {
                    zone,
                    element: Box::new(element),
                };
                if let Err(e) = self.engine.apply_mutation(mutation) {
                    log::error!("drop: {e}");
                    return None;
                }
                if let Err(e) = self.select(id) {
                    log::error!("drop: {e}");
                }
                Some(id)
            }
            DragState::Element { id } => {
                // Keep the staged element marked until drag-end.
                self.drag = Some(DragState::Element { id });
                None
            }
        }
    }

    /// The host ended the gesture (dropped or cancelled).
    pub fn drag_end(&mut self) -> bool {
        let had_highlight = !self.highlighted.is_empty();
        self.highlighted.clear();
        match self.drag.take() {
            Some(DragState::Element { id }) => {
                if let Some(zone) = self.engine.page.zone_of(id) {
                    self.engine.touch_zone(zone);
                }
                true
            }
            _ => had_highlight,
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Click on a canvas element. Clicks on interactive content don't select.
    pub fn click(&mut self, id: ElementId, target: ClickTarget) -> bool {
        if target == ClickTarget::Interactive {
            return false;
        }
        match self.select(id) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("click: {e}");
                false
            }
        }
    }

    /// Select `id`, deselecting the previous element, and project it into the form.
    ///
    /// # Errors
    /// `UnknownElement` if `id` isn't a canvas element; selection is unchanged.
    pub fn select(&mut self, id: ElementId) -> Result<(), BuilderError> {
        let element = self
            .engine
            .page
            .element(id)
            .ok_or_else(|| BuilderError::UnknownElement(id.to_string()))?;
        self.form.project(element);

        if let Some(prev) = self.selection.select(id)
            && let Some(zone) = self.engine.page.zone_of(prev)
        {
            self.engine.touch_zone(zone);
        }
        if let Some(zone) = self.engine.page.zone_of(id) {
            self.engine.touch_zone(zone);
        }
        Ok(())
    }

    // ─── Properties ──────────────────────────────────────────────────────

    /// Write form values to the selected element. Returns true if it changed.
    pub fn apply_properties(&mut self, values: &FormValues) -> bool {
        let Some(id) = self.selection.current() else {
            log::warn!("No element selected");
            return false;
        };
        let Some(element) = self.engine.page.element(id) else {
            log::warn!("No content element found");
            self.selection.clear();
            return false;
        };

        let kind = element.kind();
        let traits = kind.traits();
        let mut style = element.style.clone();
        let mut mutations = Vec::with_capacity(2);

        if traits.has_content {
            let text = values.content.clone().unwrap_or_default();
            if let Some(content) = kind.content_from_text(text) {
                mutations.push(PageMutation::SetContent { id, content });
            }
        }

        if traits.applies_color {
            style.color = Some(match values.color.as_deref().filter(|c| !c.is_empty()) {
                Some(raw) => Color::from_hex(raw).unwrap_or_else(|| {
                    log::warn!("invalid color `{raw}`, using {}", traits.default_color);
                    traits.default_color
                }),
                None => traits.default_color,
            });
        }

        apply_size(kind, &mut style, values.size());
        mutations.push(PageMutation::SetStyle { id, style });

        let mut changed = false;
        for mutation in mutations {
            match self.engine.apply_mutation(mutation) {
                Ok(c) => changed |= c,
                Err(e) => {
                    log::error!("Error applying properties: {e}");
                    return changed;
                }
            }
        }
        changed
    }

    /// Remove the selected element, clear selection, and reset the form.
    /// No-op when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.current() else {
            return false;
        };
        match self.engine.apply_mutation(PageMutation::RemoveElement { id }) {
            Ok(changed) => {
                self.selection.clear();
                self.form.reset();
                if matches!(self.drag, Some(DragState::Element { id: d }) if d == id) {
                    self.drag = None;
                }
                changed
            }
            Err(e) => {
                log::error!("Error deleting element: {e}");
                false
            }
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn selected(&self) -> Option<ElementId> {
        self.selection.current()
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.is_selected(id)
    }

    pub fn form(&self) -> &PropertiesForm {
        &self.form
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_highlighted(&self, zone: ElementId) -> bool {
        self.highlighted.contains(&zone)
    }

    pub fn page(&self) -> &PageGraph {
        &self.engine.page
    }

    /// Element currently being dragged within the canvas.
    pub fn dragging(&self) -> Option<ElementId> {
        match self.drag {
            Some(DragState::Element { id }) => Some(id),
            _ => None,
        }
    }

    /// Selection and dragging markers for rendering.
    pub fn render_state(&self) -> RenderState {
        RenderState {
            selected: self.selection.current(),
            dragging: self.dragging(),
        }
    }

    /// Markup for one zone, with selection and dragging markers.
    pub fn render_zone(&self, zone: ElementId) -> String {
        render_zone(&self.engine.page, zone, self.render_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor() -> CanvasEditor {
        CanvasEditor::new(["ed_main", "ed_side"], LayoutConfig::default())
    }

    fn drop_new(editor: &mut CanvasEditor, tag: &str, zone: &str) -> ElementId {
        editor.drag_start_palette(tag);
        editor.drop_on(ElementId::intern(zone)).unwrap()
    }

    #[test]
    fn drop_creates_and_selects() {
        let mut ed = editor();
        let id = drop_new(&mut ed, "text", "ed_main");
        assert_eq!(ed.selected(), Some(id));
        assert_eq!(ed.form().content.value, "New Text Block");
        assert!(ed.drag_state().is_none());
    }

    #[test]
    fn drop_reports_only_real_changes() {
        let mut ed = editor();
        let main = ElementId::intern("ed_main");

        // Nothing staged, nothing highlighted
        let resp = ed.handle(InputEvent::Drop { zone: main });
        assert_eq!(resp, Response::default());

        // Unknown tag, but the highlight still goes away
        ed.handle(InputEvent::palette_drag("video"));
        ed.handle(InputEvent::DragOver { zone: main, y: 0.0 });
        let resp = ed.handle(InputEvent::Drop { zone: main });
        assert!(resp.changed);
        assert_eq!(resp.created, None);

        // Unknown tag without a prior drag-over changes nothing
        ed.handle(InputEvent::palette_drag("video"));
        let resp = ed.handle(InputEvent::Drop { zone: main });
        assert!(!resp.changed);

        ed.handle(InputEvent::palette_drag("text"));
        let resp = ed.handle(InputEvent::Drop { zone: main });
        assert!(resp.changed);
        assert!(resp.created.is_some());
    }

    #[test]
    fn drop_without_drag_is_noop() {
        let mut ed = editor();
        assert_eq!(ed.drop_on(ElementId::intern("ed_main")), None);
        assert_eq!(ed.page().element_count(), 0);
    }

    #[test]
    fn drop_unknown_tag_creates_nothing() {
        let mut ed = editor();
        ed.drag_start_palette("carousel");
        assert_eq!(ed.drop_on(ElementId::intern("ed_main")), None);
        assert_eq!(ed.page().element_count(), 0);
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn empty_tag_is_not_staged() {
        let mut ed = editor();
        ed.drag_start_palette("");
        assert!(ed.drag_state().is_none());
    }

    #[test]
    fn interactive_click_does_not_select() {
        let mut ed = editor();
        let button = drop_new(&mut ed, "button", "ed_main");
        let text = drop_new(&mut ed, "text", "ed_main");
        assert_eq!(ed.selected(), Some(text));

        assert!(!ed.click(button, ClickTarget::Interactive));
        assert_eq!(ed.selected(), Some(text));

        assert!(ed.click(button, ClickTarget::Content));
        assert_eq!(ed.selected(), Some(button));
        assert!(!ed.is_selected(text));
    }

    #[test]
    fn select_unknown_keeps_selection() {
        let mut ed = editor();
        let text = drop_new(&mut ed, "text", "ed_main");
        assert!(ed.select(ElementId::intern("ed_ghost")).is_err());
        assert_eq!(ed.selected(), Some(text));
    }

    #[test]
    fn drag_over_highlights_and_leave_clears() {
        let mut ed = editor();
        ed.drag_start_palette("image");
        let zone = ElementId::intern("ed_side");
        let resp = ed.drag_over(zone, 10.0);
        assert!(resp.changed);
        assert_eq!(resp.drop_effect, Some(DropEffect::Copy));
        assert!(ed.is_highlighted(zone));

        assert!(ed.drag_leave(zone));
        assert!(!ed.is_highlighted(zone));
    }

    #[test]
    fn drop_clears_highlight() {
        let mut ed = editor();
        ed.drag_start_palette("image");
        let zone = ElementId::intern("ed_side");
        ed.drag_over(zone, 10.0);
        ed.drop_on(zone);
        assert!(!ed.is_highlighted(zone));
    }

    #[test]
    fn apply_without_selection_warns_and_noops() {
        let mut ed = editor();
        drop_new(&mut ed, "text", "ed_main");
        ed.delete_selected();
        let values = FormValues::default().with_content("x");
        assert!(!ed.apply_properties(&values));
    }

    #[test]
    fn handle_dispatches_submit() {
        let mut ed = editor();
        let id = drop_new(&mut ed, "text", "ed_main");
        let resp = ed.handle(InputEvent::Submit(
            FormValues::default()
                .with_content("Hello")
                .with_color("#ff0000")
                .with_size("small"),
        ));
        assert!(resp.changed);
        let el = ed.page().element(id).unwrap();
        assert_eq!(el.content, Content::Text("Hello".into()));
        assert_eq!(el.style.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(el.style.font_size_css().as_deref(), Some("14px"));
    }

    #[test]
    fn invalid_color_falls_back_to_default() {
        let mut ed = editor();
        let id = drop_new(&mut ed, "button", "ed_main");
        ed.apply_properties(&FormValues::default().with_color("blue"));
        let el = ed.page().element(id).unwrap();
        assert_eq!(el.style.color.unwrap().to_hex(), "#4caf50");
    }
}
