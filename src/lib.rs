//! abctune — parser for a constrained dialect of ABC music notation.
//!
//! Converts tune source text into an ordered, semantically resolved
//! sequence of notes and rests, each carrying a pitch value, a beat
//! duration, and an accidental. Ties are folded into single sustained
//! events, chord members after the first are zeroed out of the timeline,
//! and the declared key signature is propagated onto unmarked notes.
//!
//! # Example
//! ```
//! use abctune::parse;
//!
//! let source = "%abc\nX:1\nT:Example\nK:C ^F\nC2 D E F | G2-G2\n";
//! let tune = parse(source)?;
//! assert_eq!(tune.field('T'), Some("Example"));
//! assert_eq!(tune.total_beats(), 9);
//! # Ok::<(), abctune::AbcError>(())
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;

pub use ast::*;
pub use error::AbcError;
pub use parser::parse;

use std::path::Path;

/// Parse an ABC notation file from a file path.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tune, AbcError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| AbcError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&source)
}

/// Convert a parsed tune to a JSON string.
/// Useful for handing the resolved event list to an external renderer.
pub fn tune_to_json(tune: &Tune) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tune)
}
