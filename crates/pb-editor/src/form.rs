//! Properties form state.
//!
//! A transient projection of the selected element into the three form
//! fields. Filled on selection, read back on submit, cleared on delete.

use pb_core::model::{CanvasElement, Color, ElementSize};

/// One form input: its current value and whether it is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub value: String,
    pub visible: bool,
}

impl Default for FormField {
    fn default() -> Self {
        Self {
            value: String::new(),
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesForm {
    pub content: FormField,
    pub color: FormField,
    pub size: FormField,
}

impl PropertiesForm {
    /// Mirror `element` into the form, choosing field visibility by kind.
    pub fn project(&mut self, element: &CanvasElement) {
        let traits = element.kind().traits();

        self.content.visible = traits.has_content;
        self.color.visible = traits.shows_color;
        self.size.visible = true;

        match element.content.editable_text() {
            Some(text) => {
                self.content.value = text.to_string();
                self.color.value = element
                    .style
                    .color
                    .unwrap_or(traits.default_color)
                    .to_hex();
            }
            None => {
                self.content.value.clear();
                self.color.value = Color::BLACK.to_hex();
            }
        }

        self.size.value = element
            .style
            .size
            .unwrap_or_default()
            .as_str()
            .to_string();
    }

    /// Clear all values. Visibility is left as it was.
    pub fn reset(&mut self) {
        self.content.value.clear();
        self.color.value.clear();
        self.size.value.clear();
    }

    /// Current values, as a submit would read them.
    pub fn values(&self) -> FormValues {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        FormValues {
            content: non_empty(&self.content.value),
            color: non_empty(&self.color.value),
            size: non_empty(&self.size.value),
        }
    }
}

/// Raw values read from the form on submit. `None` means the field was
/// absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub content: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl FormValues {
    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }

    /// Parsed size; missing or unknown values fall back to medium.
    pub fn size(&self) -> ElementSize {
        self.size
            .as_deref()
            .map_or(ElementSize::Medium, ElementSize::parse_or_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::catalog::create_element;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_projection() {
        let el = create_element("text").unwrap();
        let mut form = PropertiesForm::default();
        form.project(&el);
        assert_eq!(form.content.value, "New Text Block");
        assert!(form.content.visible);
        assert_eq!(form.color.value, "#000000");
        assert!(form.color.visible);
        assert_eq!(form.size.value, "medium");
    }

    #[test]
    fn button_projection_uses_background_default() {
        let el = create_element("button").unwrap();
        let mut form = PropertiesForm::default();
        form.project(&el);
        assert_eq!(form.content.value, "Click Me");
        assert_eq!(form.color.value, "#4caf50");
    }

    #[test]
    fn divider_hides_content_and_color() {
        let el = create_element("divider").unwrap();
        let mut form = PropertiesForm::default();
        form.content.value = "stale".into();
        form.project(&el);
        assert!(!form.content.visible);
        assert!(!form.color.visible);
        assert!(form.size.visible);
        assert_eq!(form.content.value, "");
        assert_eq!(form.color.value, "#000000");
    }

    #[test]
    fn image_hides_content_only() {
        let el = create_element("image").unwrap();
        let mut form = PropertiesForm::default();
        form.project(&el);
        assert!(!form.content.visible);
        assert!(form.color.visible);
    }

    #[test]
    fn reset_clears_values_keeps_visibility() {
        let el = create_element("divider").unwrap();
        let mut form = PropertiesForm::default();
        form.project(&el);
        form.reset();
        assert_eq!(form.values(), FormValues::default());
        assert!(!form.content.visible);
    }

    #[test]
    fn unknown_size_is_medium() {
        assert_eq!(FormValues::default().size(), ElementSize::Medium);
        assert_eq!(FormValues::default().with_size("xl").size(), ElementSize::Medium);
        assert_eq!(FormValues::default().with_size("small").size(), ElementSize::Small);
    }
}
