//! # Tune Parser
//!
//! Turns raw source text into a validated [`Tune`].
//!
//! ## Pipeline
//! 1. Check the leading `%abc` marker line
//! 2. Scan information-field lines into the header until the body starts
//! 3. Clean the body and scan it into raw events (`lexer`)
//! 4. Fold ties and chords over the event sequence
//! 5. Validate the header and propagate the key signature (`semantic`)
//!
//! ## Tie and chord folding
//! Two flags carry state across the event scan. `pending_tie` marks that
//! the previous token ended in `-`: if the next event has the same name,
//! the pair collapses into the earlier event with summed durations. A tie
//! between differently named events merges nothing — that's tolerated
//! malformed input, not an error. `in_chord` marks an open `[` group:
//! every member after the first has its duration zeroed, so a chord
//! contributes only its first member's duration to the timeline.
//!
//! Tie resolution runs before chord zeroing so a tied note's real duration
//! is summed before being folded into a chord. The transition order on a
//! token carrying both `[` and `]` follows the reference behavior: when not
//! already in a chord, only `chord_start` is consulted, so `[C]` leaves the
//! chord flag armed for the next event.

use crate::ast::{Event, InformationField, Tune};
use crate::error::AbcError;
use crate::lexer::{strip_decorators, RawEvent, Scanner};
use crate::semantic;

/// Parse ABC source text into a `Tune`.
///
/// The first line must be the literal marker `%abc`. Header lines of the
/// form `<letter>:<value>` follow; the first non-blank line that isn't an
/// information field starts the body.
pub fn parse(source: &str) -> Result<Tune, AbcError> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return Err(AbcError::EmptyInput);
    }
    if lines[0].trim() != "%abc" {
        return Err(AbcError::MissingMarker);
    }

    let mut fields = Vec::new();
    let mut body_start = lines.len();
    for (i, line) in lines.iter().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            // Blank lines inside the header are skipped
            continue;
        }
        match information_field(line) {
            Some(field) => fields.push(field),
            None => {
                body_start = i;
                break;
            }
        }
    }

    let body: String = lines[body_start..]
        .iter()
        .map(|line| line.trim())
        .collect();
    let body = strip_decorators(&body);

    let raw_events = Scanner::new(&body).scan()?;
    let events = fold_events(raw_events);

    semantic::validate_header(&fields)?;
    let mut tune = Tune { fields, events };
    semantic::propagate_key_signature(&mut tune)?;
    Ok(tune)
}

/// Parse one header line, e.g. `T:Greensleeves`.
///
/// The key letter is uppercased on ingestion; the value is the raw text
/// after the colon. Returns `None` for lines that aren't fields.
fn information_field(line: &str) -> Option<InformationField> {
    let mut chars = line.chars();
    let key = chars.next().filter(|c| c.is_ascii_alphabetic())?;
    if chars.next() != Some(':') {
        return None;
    }
    Some(InformationField::new(
        key.to_ascii_uppercase(),
        chars.as_str(),
    ))
}

/// Fold ties and chords over the scanned events.
fn fold_events(raw_events: Vec<RawEvent>) -> Vec<Event> {
    let mut events: Vec<Event> = Vec::new();
    let mut pending_tie = false;
    let mut in_chord = false;

    for token in raw_events {
        events.push(token.event);

        if pending_tie {
            let last = events.len() - 1;
            if last > 0 && events[last - 1].same_name(&events[last]) {
                // Sum into the earlier event and drop the later one
                let combined = events[last - 1].duration() + events[last].duration();
                events[last - 1].set_duration(combined);
                events.pop();
            }
        }
        pending_tie = token.tie;

        if in_chord {
            // Non-leading chord members never contribute to the timeline
            let last = events.len() - 1;
            events[last].set_duration(0);
            in_chord = !token.chord_end;
        } else {
            in_chord = token.chord_start;
        }
    }

    events
}
