//! HTML emitter: page model → drop-zone markup.
//!
//! A zone can be emitted whole (`render_zone`), or patched wrapper by
//! wrapper (`element_class` + `render_content`) when live DOM nodes must
//! survive, e.g. an element in the middle of a native drag. Element wrappers
//! carry `data-id` so DOM events can be routed back by ID.

use crate::id::ElementId;
use crate::model::*;
use std::fmt::Write;

/// Per-render state that isn't part of the page model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderState {
    pub selected: Option<ElementId>,
    pub dragging: Option<ElementId>,
}

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the elements of `zone`, in order. Unknown zones render as empty.
#[must_use]
pub fn render_zone(page: &PageGraph, zone: ElementId, state: RenderState) -> String {
    let mut out = String::new();
    let Some(zone_idx) = page.zone_index(zone) else {
        return out;
    };
    for &child in page.children(zone_idx) {
        if let Some(element) = page.graph[child].as_element() {
            emit_element(&mut out, element, state);
        }
    }
    out
}

fn emit_element(out: &mut String, element: &CanvasElement, state: RenderState) {
    let _ = write!(
        out,
        r#"<div class="{}" draggable="true" data-id="{}" data-type="{}">{}</div>"#,
        element_class(element.id, state),
        escape_html(element.id.as_str()),
        element.kind().tag(),
        render_content(element),
    );
}

/// Class list of an element wrapper.
pub fn element_class(id: ElementId, state: RenderState) -> String {
    let mut class = String::from("canvas-element");
    if state.selected == Some(id) {
        class.push_str(" selected");
    }
    if state.dragging == Some(id) {
        class.push_str(" dragging");
    }
    class
}

/// Inner markup of an element wrapper: its `.element-content` block.
pub fn render_content(element: &CanvasElement) -> String {
    let style = &element.style;
    match &element.content {
        Content::Text(text) => {
            let css = inline_style(&[
                ("color", style.color.map(|c| c.to_hex())),
                ("font-size", style.font_size_css()),
            ]);
            format!(
                r#"<div class="element-content"{css}>{}</div>"#,
                escape_html(text)
            )
        }
        Content::Image { src, alt } => format!(
            r#"<div class="element-content"><img src="{}" alt="{}" style="max-width:100%"></div>"#,
            escape_html(src),
            escape_html(alt)
        ),
        Content::Button { label } => {
            let css = inline_style(&[
                ("background-color", style.color.map(|c| c.to_hex())),
                ("padding", style.padding_css()),
            ]);
            format!(
                r#"<div class="element-content"><button{css}>{}</button></div>"#,
                escape_html(label)
            )
        }
        Content::Rule => r#"<div class="element-content"><hr></div>"#.to_string(),
    }
}

/// ` style="k:v;..."` for the present properties, or empty.
fn inline_style(props: &[(&str, Option<String>)]) -> String {
    let body: Vec<String> = props
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| format!("{k}:{v}")))
        .collect();
    if body.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, body.join(";"))
    }
}
