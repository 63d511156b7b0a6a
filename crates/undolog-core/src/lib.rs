/// Reference document for the undo log.
///
/// A rope-backed `Document` with markers, text properties, and a
/// modification clock. Its editing operations drive an
/// `undolog_history::UndoManager` the way an editor's primitive layer does.
pub mod buffer;
pub mod document;

pub use buffer::TextBuffer;
pub use document::Document;
