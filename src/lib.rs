//! A small PEG recognition engine.
//!
//! Grammar-definition text is built once into an immutable [`Grammar`]
//! (ordered choice, repetition, negative lookahead, rule recursion and the
//! built-in terminals `letter`, `digit` and `end`), and a [`Matcher`]
//! decides whether a candidate string is consumed in full by a named start
//! rule. No parse tree is produced; the verdict is a single boolean.
//!
//! ```
//! let verdict = pegrec::matches("bits = (\"0\" | \"1\")+", "bits", "1101").unwrap();
//! assert!(verdict);
//! ```

use anyhow::Result;

pub mod grammar;
pub mod matcher;

pub use crate::grammar::Grammar;
pub use crate::matcher::Matcher;

/// Build `grammar` and report whether `start` matches `input` in full.
///
/// One-shot convenience over [`Grammar`] + [`Matcher`]; build the grammar
/// once instead when matching many candidates against it.
pub fn matches(grammar: &str, start: &str, input: &str) -> Result<bool> {
    let grammar: Grammar = grammar.parse()?;
    Matcher::new(&grammar).matches(start, input)
}
