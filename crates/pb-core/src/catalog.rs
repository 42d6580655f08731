//! Palette catalog and element factory.
//!
//! Every per-type decision (default content, which form fields apply, how a
//! size choice maps to style) lives in one lookup table keyed by
//! [`ElementKind`]. The editor never branches on the type tag itself.

use crate::error::BuilderError;
use crate::id::ElementId;
use crate::model::{CanvasElement, Color, Content, ElementKind, ElementSize, ElementStyle, Padding};

pub const DEFAULT_TEXT: &str = "New Text Block";
pub const DEFAULT_BUTTON_LABEL: &str = "Click Me";
pub const PLACEHOLDER_IMAGE_SRC: &str = "https://via.placeholder.com/150";
pub const PLACEHOLDER_IMAGE_ALT: &str = "Placeholder";

/// Button background when none has been set.
pub const DEFAULT_BUTTON_COLOR: Color = Color::rgb(0x4c, 0xaf, 0x50);

/// Which style property a size choice drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTarget {
    /// Font size: small=14px, medium=16px, large=18px.
    FontSize,
    /// Padding: small=5px 10px, medium=8px 15px, large=10px 20px.
    Padding,
    /// Size is shown in the form but has no visual effect.
    None,
}

/// Static description of one palette entry type.
#[derive(Debug, Clone, Copy)]
pub struct KindTraits {
    pub kind: ElementKind,
    /// Human-readable palette label.
    pub label: &'static str,
    /// Content field is shown and written.
    pub has_content: bool,
    /// Color field is shown.
    pub shows_color: bool,
    /// Color writes are applied to the element.
    pub applies_color: bool,
    /// Color projected into the form when the element has none.
    pub default_color: Color,
    pub size_target: SizeTarget,
}

const TRAITS: [KindTraits; 4] = [
    KindTraits {
        kind: ElementKind::Text,
        label: "Text",
        has_content: true,
        shows_color: true,
        applies_color: true,
        default_color: Color::BLACK,
        size_target: SizeTarget::FontSize,
    },
    KindTraits {
        kind: ElementKind::Image,
        label: "Image",
        has_content: false,
        // The color field is visible for images but writes are ignored.
        shows_color: true,
        applies_color: false,
        default_color: Color::BLACK,
        size_target: SizeTarget::None,
    },
    KindTraits {
        kind: ElementKind::Button,
        label: "Button",
        has_content: true,
        shows_color: true,
        applies_color: true,
        default_color: DEFAULT_BUTTON_COLOR,
        size_target: SizeTarget::Padding,
    },
    KindTraits {
        kind: ElementKind::Divider,
        label: "Divider",
        has_content: false,
        shows_color: false,
        applies_color: false,
        default_color: Color::BLACK,
        size_target: SizeTarget::None,
    },
];

impl ElementKind {
    /// The catalog entry for this kind.
    pub fn traits(self) -> &'static KindTraits {
        match self {
            Self::Text => &TRAITS[0],
            Self::Image => &TRAITS[1],
            Self::Button => &TRAITS[2],
            Self::Divider => &TRAITS[3],
        }
    }

    /// Default payload for a freshly dropped element.
    pub fn default_content(self) -> Content {
        match self {
            Self::Text => Content::Text(DEFAULT_TEXT.to_string()),
            Self::Image => Content::Image {
                src: PLACEHOLDER_IMAGE_SRC.to_string(),
                alt: PLACEHOLDER_IMAGE_ALT.to_string(),
            },
            Self::Button => Content::Button {
                label: DEFAULT_BUTTON_LABEL.to_string(),
            },
            Self::Divider => Content::Rule,
        }
    }

    /// Payload carrying form-supplied text, for kinds with editable content.
    pub fn content_from_text(self, text: String) -> Option<Content> {
        match self {
            Self::Text => Some(Content::Text(text)),
            Self::Button => Some(Content::Button { label: text }),
            Self::Image | Self::Divider => None,
        }
    }
}

/// The palette: the four entries in display order.
pub fn palette() -> &'static [KindTraits] {
    &TRAITS
}

/// Font size in px for a text element of the given size.
pub fn font_size_for(size: ElementSize) -> u16 {
    match size {
        ElementSize::Small => 14,
        ElementSize::Medium => 16,
        ElementSize::Large => 18,
    }
}

/// Padding for a button of the given size.
pub fn padding_for(size: ElementSize) -> Padding {
    match size {
        ElementSize::Small => Padding::new(5, 10),
        ElementSize::Medium => Padding::new(8, 15),
        ElementSize::Large => Padding::new(10, 20),
    }
}

/// Apply a size choice to `style` according to the kind's size target.
pub fn apply_size(kind: ElementKind, style: &mut ElementStyle, size: ElementSize) {
    style.size = Some(size);
    match kind.traits().size_target {
        SizeTarget::FontSize => style.font_size = Some(font_size_for(size)),
        SizeTarget::Padding => style.padding = Some(padding_for(size)),
        SizeTarget::None => {}
    }
}

/// Create a new canvas element from a palette `data-type` tag.
///
/// Unknown tags produce no element; the caller reports the error.
pub fn create_element(tag: &str) -> Result<CanvasElement, BuilderError> {
    let kind: ElementKind = tag.parse()?;
    let id = ElementId::with_prefix(kind.tag());
    log::debug!("create {kind} element {id}");
    Ok(CanvasElement::new(id, kind, kind.default_content()))
}
