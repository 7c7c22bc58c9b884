//! # Semantic Passes
//!
//! Structural validation of the tune header, and key-signature propagation
//! over the finished event sequence.
//!
//! ## Header rules
//! A tune header needs at least three information fields, beginning with
//! `X:` (reference number) followed by `T:` (title), and ending with `K:`
//! (key). Violations are hard errors naming the broken rule.
//!
//! ## Key-signature propagation
//! Only the degenerate "C with explicit accidentals" key form is supported:
//! the `K:` value must read `C` followed by space-separated `<mark><letter>`
//! entries, e.g. `K:C ^F _B`. Each entry applies its accidental to every
//! note with a matching letter (case-insensitive, any octave) that carries
//! no explicit accidental of its own, recomputing the pitch value. Explicit
//! accidentals from the body always win. Entries that aren't two characters
//! or whose mark isn't `^`/`=`/`_` are skipped silently; only the overall
//! `C ...` shape is enforced.
//!
//! Propagation runs exactly once, at tune construction, after tie and chord
//! folding.

use crate::ast::{Accidental, Event, InformationField, Tune};
use crate::error::AbcError;

/// Validate the structural rules of the tune header.
pub fn validate_header(fields: &[InformationField]) -> Result<(), AbcError> {
    if fields.len() < 3 {
        return Err(AbcError::HeaderTooShort);
    }
    if fields[0].key != 'X' {
        return Err(AbcError::HeaderOrderInvalid {
            message: "tune header must begin with X:".to_string(),
        });
    }
    if fields[1].key != 'T' {
        return Err(AbcError::HeaderOrderInvalid {
            message: "X: must be followed by T:".to_string(),
        });
    }
    // len >= 3 checked above, last() cannot be None
    if fields.last().map(|f| f.key) != Some('K') {
        return Err(AbcError::HeaderOrderInvalid {
            message: "tune header must end with K:".to_string(),
        });
    }
    Ok(())
}

/// Apply the declared key signature to every eligible note in place.
pub fn propagate_key_signature(tune: &mut Tune) -> Result<(), AbcError> {
    let value = tune.field('K').unwrap_or_default().to_string();
    let mut entries = value.split(' ');
    if entries.next() != Some("C") {
        return Err(AbcError::KeySignatureUnsupported { value });
    }

    for entry in entries {
        let mut chars = entry.chars();
        let (Some(mark), Some(letter), None) = (chars.next(), chars.next(), chars.next()) else {
            continue;
        };
        let Some(accidental) = Accidental::from_mark(mark) else {
            continue;
        };
        let letter = letter.to_ascii_lowercase();

        for event in &mut tune.events {
            if let Event::Note(note) = event {
                let matches = note
                    .name
                    .chars()
                    .next()
                    .is_some_and(|c| c.to_ascii_lowercase() == letter);
                if matches && note.accidental.is_none() {
                    note.set_accidental(accidental);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Note;
    use pretty_assertions::assert_eq;

    fn field(key: char, value: &str) -> InformationField {
        InformationField::new(key, value)
    }

    fn header(keys: &[char]) -> Vec<InformationField> {
        keys.iter().map(|&k| field(k, "v")).collect()
    }

    fn tune_with_key(key_value: &str, events: Vec<Event>) -> Tune {
        Tune {
            fields: vec![field('X', "1"), field('T', "Test"), field('K', key_value)],
            events,
        }
    }

    fn note(name: &str) -> Event {
        Event::Note(Note::new(name, None, 1).unwrap())
    }

    #[test]
    fn test_minimal_valid_header() {
        assert!(validate_header(&header(&['X', 'T', 'K'])).is_ok());
        assert!(validate_header(&header(&['X', 'T', 'M', 'L', 'K'])).is_ok());
    }

    #[test]
    fn test_header_too_short() {
        assert!(matches!(
            validate_header(&header(&['X', 'T'])),
            Err(AbcError::HeaderTooShort)
        ));
        assert!(matches!(validate_header(&[]), Err(AbcError::HeaderTooShort)));
    }

    #[test]
    fn test_header_order() {
        let err = validate_header(&header(&['T', 'X', 'K'])).unwrap_err();
        assert!(matches!(err, AbcError::HeaderOrderInvalid { ref message } if message.contains("begin with X:")));

        let err = validate_header(&header(&['X', 'M', 'K'])).unwrap_err();
        assert!(matches!(err, AbcError::HeaderOrderInvalid { ref message } if message.contains("followed by T:")));

        let err = validate_header(&header(&['X', 'T', 'M'])).unwrap_err();
        assert!(matches!(err, AbcError::HeaderOrderInvalid { ref message } if message.contains("end with K:")));
    }

    #[test]
    fn test_propagation_sets_unmarked_notes() {
        let mut tune = tune_with_key("C ^F _B", vec![note("F"), note("B"), note("G")]);
        propagate_key_signature(&mut tune).unwrap();

        let f = tune.events[0].as_note().unwrap();
        assert_eq!(f.accidental, Some(Accidental::Sharp));
        assert_eq!(f.pitch_value, 46);

        let b = tune.events[1].as_note().unwrap();
        assert_eq!(b.accidental, Some(Accidental::Flat));
        assert_eq!(b.pitch_value, 50);

        assert_eq!(tune.events[2].as_note().unwrap().accidental, None);
    }

    #[test]
    fn test_propagation_is_octave_agnostic() {
        let mut tune = tune_with_key("C ^f", vec![note("F"), note("f'"), note("F,")]);
        propagate_key_signature(&mut tune).unwrap();
        for event in &tune.events {
            assert_eq!(event.as_note().unwrap().accidental, Some(Accidental::Sharp));
        }
    }

    #[test]
    fn test_explicit_accidental_never_overridden() {
        let explicit = Event::Note(Note::new("F", Some(Accidental::Sharp), 1).unwrap());
        let mut tune = tune_with_key("C _F", vec![explicit, note("F")]);
        propagate_key_signature(&mut tune).unwrap();
        assert_eq!(tune.events[0].as_note().unwrap().accidental, Some(Accidental::Sharp));
        assert_eq!(tune.events[1].as_note().unwrap().accidental, Some(Accidental::Flat));
    }

    #[test]
    fn test_plain_c_key_is_accepted() {
        let mut tune = tune_with_key("C", vec![note("F")]);
        propagate_key_signature(&mut tune).unwrap();
        assert_eq!(tune.events[0].as_note().unwrap().accidental, None);
    }

    #[test]
    fn test_unsupported_key_signatures() {
        for value in ["", "G", "D ^F", "Cmaj"] {
            let mut tune = tune_with_key(value, vec![note("F")]);
            let result = propagate_key_signature(&mut tune);
            assert!(
                matches!(result, Err(AbcError::KeySignatureUnsupported { .. })),
                "key '{}' should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let mut tune = tune_with_key("C ^ ^FG !B ^G", vec![note("F"), note("B"), note("G")]);
        propagate_key_signature(&mut tune).unwrap();
        // Only the well-formed ^G entry applies
        assert_eq!(tune.events[0].as_note().unwrap().accidental, None);
        assert_eq!(tune.events[1].as_note().unwrap().accidental, None);
        assert_eq!(tune.events[2].as_note().unwrap().accidental, Some(Accidental::Sharp));
    }

    #[test]
    fn test_rests_ignored_by_propagation() {
        let mut tune = tune_with_key("C ^F", vec![Event::Rest { duration: 2 }, note("F")]);
        propagate_key_signature(&mut tune).unwrap();
        assert!(tune.events[0].is_rest());
        assert_eq!(tune.events[1].as_note().unwrap().accidental, Some(Accidental::Sharp));
    }
}
