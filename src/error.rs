//! # Error Types
//!
//! This module defines all error types for the abctune parser.
//!
//! Header and key-signature problems are strict, hard errors: there is no
//! partial `Tune`. Slightly malformed *bodies* are deliberately tolerated
//! instead (a tie between differently named notes simply doesn't merge, and
//! stray characters between event tokens are skipped by the scanner).
//!
//! ## Usage
//! ```rust
//! use abctune::{parse, AbcError};
//!
//! match parse("%abc\nX:1\nK:C\nC D E") {
//!     Ok(tune) => println!("{} events", tune.events.len()),
//!     Err(AbcError::HeaderTooShort) => {
//!         eprintln!("tune header must contain at least X:, T:, and K:");
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbcError {
    /// The input contained no lines at all.
    #[error("input is empty")]
    EmptyInput,

    /// The required leading `%abc` marker line was absent.
    ///
    /// The marker is how the line reader decides the input is meant to be
    /// ABC notation before committing to header parsing.
    #[error("input does not appear to be abc notation (missing %abc marker)")]
    MissingMarker,

    /// Fewer than three information fields before the body.
    #[error("tune header must contain at least X:, T:, and K:")]
    HeaderTooShort,

    /// The header fields are present but in the wrong order.
    ///
    /// The message names the violated rule, e.g.
    /// `"tune header must begin with X:"`.
    #[error("invalid tune header: {message}")]
    HeaderOrderInvalid { message: String },

    /// The `K:` field is absent, empty, or not of the literal `C ...`
    /// accidental-list form.
    ///
    /// Only the degenerate "C plus explicit accidentals" key signature is
    /// supported; general key-signature theory is out of scope.
    #[error("unsupported key signature '{value}': must be C with an optional accidental list")]
    KeySignatureUnsupported { value: String },

    /// A note letter outside the pitch table reached the pitch model.
    ///
    /// The scanner only ever emits notes for letters it recognizes, so this
    /// indicates an internal inconsistency rather than bad input.
    #[error("'{letter}' is not a valid pitch letter")]
    InvalidPitchLetter { letter: char },

    /// Reading the input file failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
