pub mod editor;
pub mod form;
pub mod input;
pub mod selection;
pub mod sync;

pub use editor::{CanvasEditor, DragState, Response};
pub use form::{FormField, FormValues, PropertiesForm};
pub use input::{ClickTarget, DragSource, DropEffect, InputEvent};
pub use selection::Selection;
pub use sync::{PageMutation, SyncEngine};
