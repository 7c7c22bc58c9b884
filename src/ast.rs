//! # Tune Data Model
//!
//! This module defines the resolved representation of a parsed tune.
//!
//! ## Type Hierarchy
//! ```text
//! Tune
//!   ├── Vec<InformationField> (header: X, T, ..., K)
//!   └── Vec<Event>
//!         ├── Note
//!         │     ├── name: String (letter + octave marks, e.g. "C", "f'", "G,")
//!         │     ├── accidental: Option<Accidental>
//!         │     ├── duration: u32 (beats)
//!         │     └── pitch_value: i32 (derived)
//!         └── Rest { duration: u32 }
//! ```
//!
//! ## Key Concepts
//!
//! ### Pitch values
//! A note's single integer pitch combines three things: a base value looked
//! up from a fixed 14-letter table (uppercase `C`–`B`, then lowercase
//! `c`–`b` one octave higher), ±12 per octave mark in the name's tail
//! (`,` down, `'` up), and the accidental's semitone delta. The table
//! values encode piano key positions on the white keys, so consecutive
//! letters are *not* a uniform semitone apart — that spacing is part of the
//! format and is reproduced exactly.
//!
//! ### Enharmonic collapse
//! Two notes compare equal iff their pitch values are equal, regardless of
//! spelling or accidental: `^C` and `_D` are the same note. Ordering over
//! notes follows pitch value only. Downstream consumers select strikers by
//! pitch value, so this is intentional — do not add name comparison.
//!
//! ### Durations
//! Beat counts, default 1. Tie folding grows the first note of a tied pair;
//! chord folding zeroes every chord member after the first. Durations are
//! only ever mutated during parsing; a returned `Tune` is final.
//!
//! ## Related Modules
//! - `lexer` - Scans body text into raw events
//! - `parser` - Folds raw events and assembles the `Tune`
//! - `semantic` - Validates the header and propagates the key signature

use crate::error::AbcError;
use serde::Serialize;
use std::cmp::Ordering;

/// The 14 recognized pitch letters, lowercase an octave above uppercase.
const PITCH_LETTERS: [char; 14] = [
    'C', 'D', 'E', 'F', 'G', 'A', 'B', 'c', 'd', 'e', 'f', 'g', 'a', 'b',
];

/// Base pitch values, by piano key position, indexed like `PITCH_LETTERS`.
const PITCH_VALUES: [i32; 14] = [40, 42, 44, 45, 47, 49, 51, 52, 54, 56, 57, 59, 61, 63];

/// A pitch modifier: flat, natural, or sharp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Accidental {
    Flat,    // _
    Natural, // =
    Sharp,   // ^
}

impl Accidental {
    /// Parse an accidental from its notation mark.
    pub fn from_mark(mark: char) -> Option<Self> {
        match mark {
            '_' => Some(Accidental::Flat),
            '=' => Some(Accidental::Natural),
            '^' => Some(Accidental::Sharp),
            _ => None,
        }
    }

    /// The shift this accidental applies to a pitch value.
    pub fn semitone_delta(&self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }
}

/// A single pitched note with a resolved pitch value.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    /// Letter plus octave-mark tail, e.g. `"C"`, `"f'"`, `"G,"`.
    pub name: String,
    /// `None` means no explicit accidental was written; such notes remain
    /// eligible for key-signature propagation.
    pub accidental: Option<Accidental>,
    /// Duration in beats.
    pub duration: u32,
    /// Derived pitch; see the module docs for how it is computed.
    pub pitch_value: i32,
}

impl Note {
    /// Create a note, computing its pitch value.
    ///
    /// Fails with [`AbcError::InvalidPitchLetter`] if the name's first
    /// character is not one of the 14 pitch letters.
    pub fn new(name: &str, accidental: Option<Accidental>, duration: u32) -> Result<Self, AbcError> {
        let pitch_value = pitch_value_of(name, accidental)?;
        Ok(Self {
            name: name.to_string(),
            accidental,
            duration,
            pitch_value,
        })
    }

    /// Set the accidental and recompute the pitch value.
    ///
    /// Used by key-signature propagation; recomputation is idempotent.
    pub fn set_accidental(&mut self, accidental: Accidental) {
        let previous = self.accidental.map_or(0, |a| a.semitone_delta());
        self.pitch_value = self.pitch_value - previous + accidental.semitone_delta();
        self.accidental = Some(accidental);
    }
}

// Equality and ordering collapse enharmonic spellings: pitch value only.
impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.pitch_value == other.pitch_value
    }
}

impl Eq for Note {}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pitch_value.cmp(&other.pitch_value)
    }
}

/// Compute the pitch value for a note name plus optional accidental.
fn pitch_value_of(name: &str, accidental: Option<Accidental>) -> Result<i32, AbcError> {
    let mut chars = name.chars();
    let letter = chars.next().ok_or(AbcError::InvalidPitchLetter { letter: ' ' })?;
    let index = PITCH_LETTERS
        .iter()
        .position(|&l| l == letter)
        .ok_or(AbcError::InvalidPitchLetter { letter })?;

    let mut value = PITCH_VALUES[index];
    for mark in chars {
        match mark {
            ',' => value -= 12,
            '\'' => value += 12,
            _ => {}
        }
    }
    if let Some(accidental) = accidental {
        value += accidental.semitone_delta();
    }
    Ok(value)
}

/// An element of the tune body: either a note or a rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    Note(Note),
    Rest { duration: u32 },
}

impl Event {
    /// Duration in beats.
    pub fn duration(&self) -> u32 {
        match self {
            Event::Note(note) => note.duration,
            Event::Rest { duration } => *duration,
        }
    }

    /// Overwrite the duration (tie and chord folding).
    pub fn set_duration(&mut self, beats: u32) {
        match self {
            Event::Note(note) => note.duration = beats,
            Event::Rest { duration } => *duration = beats,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Event::Rest { .. })
    }

    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Event::Note(note) => Some(note),
            Event::Rest { .. } => None,
        }
    }

    /// Whether two events count as "the same name" for tie folding.
    ///
    /// Notes match on their full name (letter plus octave marks); rests
    /// match any other rest.
    pub fn same_name(&self, other: &Event) -> bool {
        match (self, other) {
            (Event::Note(a), Event::Note(b)) => a.name == b.name,
            (Event::Rest { .. }, Event::Rest { .. }) => true,
            _ => false,
        }
    }
}

/// One header line, e.g. `T:Scarborough Fair` -> key `T`, value
/// `"Scarborough Fair"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InformationField {
    /// Single uppercase letter.
    pub key: char,
    /// Raw text after the colon.
    pub value: String,
}

impl InformationField {
    pub fn new(key: char, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// A complete parsed tune: header fields plus the resolved event sequence.
///
/// Construction goes through [`crate::parse`]; by the time a `Tune` is
/// returned its header has been validated and its key signature propagated.
#[derive(Debug, Clone, Serialize)]
pub struct Tune {
    /// Information fields in source order; duplicates are kept.
    pub fields: Vec<InformationField>,
    /// Notes and rests in playback order.
    pub events: Vec<Event>,
}

impl Tune {
    /// The value of the first field with the given key.
    pub fn field(&self, key: char) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    /// Iterate over the note events, skipping rests.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.events.iter().filter_map(Event::as_note)
    }

    pub fn note_count(&self) -> usize {
        self.notes().count()
    }

    /// Total length of the tune in beats.
    pub fn total_beats(&self) -> u32 {
        self.events.iter().map(Event::duration).sum()
    }

    /// Minimum and maximum pitch value over all notes, or `None` if the
    /// body contains no notes.
    pub fn pitch_range(&self) -> Option<(i32, i32)> {
        let mut values = self.notes().map(|n| n.pitch_value);
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(min, max), v| (min.min(v), max.max(v)));
        Some((min, max))
    }

    /// Number of scale steps the tune spans (max − min + 1).
    ///
    /// A music-box consumer compares this against its comb's tooth count.
    pub fn pitch_span(&self) -> Option<i32> {
        self.pitch_range().map(|(min, max)| max - min + 1)
    }

    /// Remove leading and trailing rests, returning the beats removed.
    ///
    /// Interior rests are untouched.
    pub fn trim_rests(&mut self) -> u32 {
        let mut removed = 0;
        while self.events.first().is_some_and(Event::is_rest) {
            removed += self.events.remove(0).duration();
        }
        while self.events.last().is_some_and(Event::is_rest) {
            removed += self.events.pop().map_or(0, |e| e.duration());
        }
        removed
    }
}
