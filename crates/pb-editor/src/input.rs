//! Input abstraction layer.
//!
//! Normalizes the host's drag-and-drop, click, and form events into a single
//! `InputEvent` enum consumed by the editor.

use crate::form::FormValues;
use pb_core::id::ElementId;

/// What a drag gesture started on.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// A palette entry, identified by its raw `data-type` attribute.
    Palette { tag: String },
    /// An element already placed on the canvas.
    Element(ElementId),
}

/// Where inside a canvas element a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The element wrapper itself.
    Element,
    /// Non-interactive content (text, image, rule).
    Content,
    /// Interactive sub-content, e.g. a button's own `<button>`.
    Interactive,
}

impl ClickTarget {
    /// Map a DOM `tagName` to a click target.
    pub fn from_tag_name(tag_name: &str) -> Self {
        match tag_name.to_ascii_uppercase().as_str() {
            "BUTTON" => Self::Interactive,
            _ => Self::Content,
        }
    }
}

/// Drop effect reported back to the host's `dataTransfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
    Move,
}

impl DropEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Move => "move",
        }
    }
}

/// A normalized UI event, processed strictly in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    DragStart(DragSource),
    /// Pointer over a drop zone, with its Y in page coordinates.
    DragOver { zone: ElementId, y: f32 },
    DragLeave { zone: ElementId },
    Drop { zone: ElementId },
    DragEnd,
    Click { element: ElementId, target: ClickTarget },
    Submit(FormValues),
    Delete,
}

impl InputEvent {
    pub fn palette_drag(tag: &str) -> Self {
        Self::DragStart(DragSource::Palette {
            tag: tag.to_string(),
        })
    }

    pub fn element_drag(id: ElementId) -> Self {
        Self::DragStart(DragSource::Element(id))
    }

    /// Pointer Y if this is a positional event.
    pub fn pointer_y(&self) -> Option<f32> {
        match self {
            Self::DragOver { y, .. } => Some(*y),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_tag_is_interactive() {
        assert_eq!(ClickTarget::from_tag_name("BUTTON"), ClickTarget::Interactive);
        assert_eq!(ClickTarget::from_tag_name("button"), ClickTarget::Interactive);
        assert_eq!(ClickTarget::from_tag_name("DIV"), ClickTarget::Content);
        assert_eq!(ClickTarget::from_tag_name("IMG"), ClickTarget::Content);
    }

    #[test]
    fn pointer_y_only_for_drag_over() {
        let zone = ElementId::intern("input_zone");
        assert_eq!(InputEvent::DragOver { zone, y: 12.0 }.pointer_y(), Some(12.0));
        assert_eq!(InputEvent::DragEnd.pointer_y(), None);
    }
}
