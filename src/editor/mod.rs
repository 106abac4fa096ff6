//! Buffer editing: the selection-preserving text model, the formatting-action
//! and media tables, offset mapping for the host widget, and Enter continuation.

pub mod actions;
pub mod continuation;
pub mod model;
pub mod position;
