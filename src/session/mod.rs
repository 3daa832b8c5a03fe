//! Host-facing editing session

/// Pointer event routing between tools, panning and hover
pub mod editor;

pub use editor::Editor;
