//! # Body Scanner
//!
//! Cleans the tune body and scans it into raw event tokens.
//!
//! The body arrives as one string with every decoration the parser doesn't
//! understand still present (bar lines, slurs, lyrics and so on).
//! [`strip_decorators`] removes everything that isn't part of an event
//! token, and [`Scanner`] then applies the event grammar as a global scan:
//!
//! ```text
//! [?  [^=_]*  LETTER  [,']?  [0-9]?  ]?  -?
//! ```
//!
//! Characters that don't start a token are skipped rather than rejected;
//! the format is deliberately permissive about body noise. The letters `z`
//! and `x` (either case) produce rests, every other letter a note.
//!
//! Each scanned [`RawEvent`] carries the chord and tie flags captured from
//! its token. The flags drive the folding pass in `parser` and are not
//! retained in the final `Tune`.

use crate::ast::{Accidental, Event, Note};
use crate::error::AbcError;

/// A scanned event plus the grouping flags captured from its token.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub event: Event,
    pub chord_start: bool,
    pub chord_end: bool,
    pub tie: bool,
}

/// Strip non-notation characters from body text.
///
/// Keeps letters, digits, whitespace, and `/ - ^ _ , ' = [ ]`; collapses
/// whitespace runs to single spaces; and rejoins ties left dangling by a
/// removed decoration (`"- "` becomes `"-"` so the tie binds directly to
/// the next token).
pub fn strip_decorators(content: &str) -> String {
    let mut cleaned = String::with_capacity(content.len());
    let mut in_whitespace = false;
    for c in content.chars() {
        if c.is_whitespace() {
            in_whitespace = true;
            continue;
        }
        // Dropped decorations are transparent: stripping happens before
        // whitespace collapsing
        if c.is_ascii_alphanumeric() || "/-^_,'=[]".contains(c) {
            if in_whitespace && !cleaned.is_empty() {
                cleaned.push(' ');
            }
            cleaned.push(c);
            in_whitespace = false;
        }
    }
    cleaned.replace("- ", "-")
}

/// Scanner applying the event grammar to cleaned body text.
pub struct Scanner {
    chars: Vec<char>,
    position: usize,
}

impl Scanner {
    pub fn new(body: &str) -> Self {
        Self {
            chars: body.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// Consume the next char if it satisfies the predicate.
    fn advance_if(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(c) if predicate(c) => self.advance(),
            _ => None,
        }
    }

    /// Scan the whole body into raw events.
    pub fn scan(&mut self) -> Result<Vec<RawEvent>, AbcError> {
        let mut events = Vec::new();
        while self.position < self.chars.len() {
            match self.scan_event()? {
                Some(raw) => events.push(raw),
                // Not the start of an event token; skip one char and retry
                None => self.position += 1,
            }
        }
        Ok(events)
    }

    /// Try to match one event token at the current position.
    ///
    /// Returns `Ok(None)` and restores the position when no token starts
    /// here. The grammar requires a letter, so a stray `[` or accidental
    /// mark with nothing behind it never produces an event.
    fn scan_event(&mut self) -> Result<Option<RawEvent>, AbcError> {
        let start = self.position;

        let chord_start = self.advance_if(|c| c == '[').is_some();

        // Accidental run; the mark immediately before the letter wins
        let mut accidental = None;
        while let Some(mark) = self.advance_if(|c| matches!(c, '^' | '=' | '_')) {
            accidental = Accidental::from_mark(mark);
        }

        let Some(letter) = self.advance_if(|c| c.is_ascii_alphabetic()) else {
            self.position = start;
            return Ok(None);
        };

        let mut name = String::from(letter);
        if let Some(mark) = self.advance_if(|c| c == ',' || c == '\'') {
            name.push(mark);
        }

        let duration = match self.advance_if(|c| c.is_ascii_digit()) {
            Some(digit) => digit as u32 - '0' as u32,
            None => 1,
        };

        let chord_end = self.advance_if(|c| c == ']').is_some();
        let tie = self.advance_if(|c| c == '-').is_some();

        let event = if letter.eq_ignore_ascii_case(&'z') || letter.eq_ignore_ascii_case(&'x') {
            Event::Rest { duration }
        } else {
            Event::Note(Note::new(&name, accidental, duration)?)
        };

        Ok(Some(RawEvent {
            event,
            chord_start,
            chord_end,
            tie,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(body: &str) -> Vec<RawEvent> {
        Scanner::new(body).scan().unwrap()
    }

    #[test]
    fn test_strip_keeps_notation_characters() {
        assert_eq!(strip_decorators("C2 D | !trill! E"), "C2 D trill E");
        assert_eq!(strip_decorators("[CEG]2 ^F _B ="), "[CEG]2 ^F _B =");
    }

    #[test]
    fn test_strip_collapses_whitespace() {
        assert_eq!(strip_decorators("C   D\t\tE"), "C D E");
    }

    #[test]
    fn test_strip_rejoins_ties() {
        // Removing a bar line leaves "- " which must rebind to the next token
        assert_eq!(strip_decorators("C2- | C2"), "C2-C2");
    }

    #[test]
    fn test_simple_notes() {
        let events = scan("C D");
        assert_eq!(events.len(), 2);
        let note = events[0].event.as_note().unwrap();
        assert_eq!(note.name, "C");
        assert_eq!(note.duration, 1);
        assert_eq!(note.accidental, None);
        assert!(!events[0].chord_start && !events[0].chord_end && !events[0].tie);
    }

    #[test]
    fn test_duration_digit() {
        let events = scan("C2");
        assert_eq!(events[0].event.duration(), 2);
    }

    #[test]
    fn test_octave_marks() {
        let events = scan("C, c'");
        assert_eq!(events[0].event.as_note().unwrap().name, "C,");
        assert_eq!(events[1].event.as_note().unwrap().name, "c'");
    }

    #[test]
    fn test_accidentals() {
        let events = scan("^F _B =C");
        assert_eq!(events[0].event.as_note().unwrap().accidental, Some(Accidental::Sharp));
        assert_eq!(events[1].event.as_note().unwrap().accidental, Some(Accidental::Flat));
        assert_eq!(events[2].event.as_note().unwrap().accidental, Some(Accidental::Natural));
    }

    #[test]
    fn test_accidental_run_last_mark_wins() {
        let events = scan("^_C");
        assert_eq!(events[0].event.as_note().unwrap().accidental, Some(Accidental::Flat));
    }

    #[test]
    fn test_rests() {
        let events = scan("z2 x Z");
        assert!(events.iter().all(|e| e.event.is_rest()));
        assert_eq!(events[0].event.duration(), 2);
        assert_eq!(events[1].event.duration(), 1);
    }

    #[test]
    fn test_chord_flags() {
        let events = scan("[C2EG]");
        assert_eq!(events.len(), 3);
        assert!(events[0].chord_start);
        assert!(!events[0].chord_end);
        assert!(!events[1].chord_start && !events[1].chord_end);
        assert!(events[2].chord_end);
        // The duration digit rides on the leading member's token
        assert_eq!(events[0].event.duration(), 2);
    }

    #[test]
    fn test_tie_flag() {
        let events = scan("C2-C2");
        assert!(events[0].tie);
        assert!(!events[1].tie);
    }

    #[test]
    fn test_stray_characters_skipped() {
        // '/' and a lone digit never start an event token
        let events = scan("C/2 D");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event.duration(), 1);
        assert_eq!(events[1].event.as_note().unwrap().name, "D");
    }

    #[test]
    fn test_stray_bracket_without_letter() {
        let events = scan("[3C]");
        assert_eq!(events.len(), 1);
        // The '[' cannot attach across the stray digit
        assert!(!events[0].chord_start);
        assert!(events[0].chord_end);
    }

    #[test]
    fn test_invalid_letter_is_hard_error() {
        let result = Scanner::new("C H").scan();
        assert!(matches!(result, Err(AbcError::InvalidPitchLetter { letter: 'H' })));
    }
}
