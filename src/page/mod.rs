//! The scrolled document: blocks of text the terminal host lays out in
//! pixels and hands to the engine as its surface.

pub mod document;
pub mod parse;

pub use document::{Page, PageNode};
pub use parse::PageError;
