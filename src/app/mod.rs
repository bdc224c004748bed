//! Application orchestration: state management, event loop plumbing, and
//! input handling.

pub mod event;
pub mod frame;
pub mod handler;
pub mod state;
