//! Pipeline stages for LaTeX-to-HTML conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ rewrite (rules)
//! (URL/path) (name, location) (ordered regex table)
//! ```
//!
//! 1. [`input`]  : read the user-supplied path or GET the URL; the only
//!    stage with I/O
//! 2. [`extract`]: pull the name and location out of the raw source before
//!    anything is rewritten
//! 3. [`rewrite`]: run the [`rules`] table over a working buffer and record
//!    what fired and what the fallback stage stripped

pub mod extract;
pub mod input;
pub mod rewrite;
pub mod rules;
