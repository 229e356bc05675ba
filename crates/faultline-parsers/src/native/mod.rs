//! Native-AST symbol extraction, used where the source language's own
//! standard library exposes a parser. Python is the only such language
//! currently recognized; every other language falls back to tree-sitter.

pub mod python;
