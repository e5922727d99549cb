//! Source position tracking for pyreact-rs.
//!
//! Provides byte-offset [`Span`]s, which the lexer and parser attach to
//! everything they produce, and a [`LineIndex`] for turning those
//! offsets into the line/column pairs that diagnostics print.

mod line_index;
mod span;

pub use line_index::{LineCol, LineIndex};
pub use span::Span;
pub use text_size::TextSize;
