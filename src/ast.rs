#![forbid(unsafe_code)]

//! The mutable style-sheet tree rules operate on
//!
//! Nodes live in an arena owned by [`Stylesheet`]; parents own their children
//! through ordered id lists and children point back with a parent id that is
//! used for navigation only. The parser and printer cover nested blocks,
//! declarations, at-rules and comments, and keep enough whitespace to print a
//! tree back exactly as it was read.

mod node;
mod parser;
mod printer;
mod tree;

pub use node::{NodeData, NodeId, NodeKind, Raws};
pub use parser::parse;
pub use tree::Stylesheet;
