//! Headless client screens: the department list, the edit form and the
//! shell that routes between them.

pub mod app;
pub mod edit;
pub mod list;
pub mod router;

/// Fetch state of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}
