//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads the page geometry the engine has already written and
//! turns it into cells on the terminal.  No scroll state changes here.

pub mod layout;
pub mod page_widget;
pub mod spinner;
pub mod theme;
