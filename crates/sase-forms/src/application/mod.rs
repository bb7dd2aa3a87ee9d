//! Application layer
//!
//! The shared schema store plus the builder and renderer view models that
//! work against it.

pub mod editor;
pub mod loader;
pub mod renderer;
pub mod store;

pub use editor::{EditorSection, EditorView, QuestionEditor, DEFAULT_AUTOSAVE_DELAY};
pub use loader::SchemaLoadService;
pub use renderer::{Control, FormRenderer, InputKind, RenderedField, EMPTY_STATE, SubmissionStatus, ValidatorCache};
pub use store::FormStore;
