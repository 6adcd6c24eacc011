//! Pure identifier-case transformers.
//!
//! Each function is total: any input byte sequence produces a fresh
//! owned `String`, never mutating the source. Separators `-`, `&`, `_`
//! (and, for [`lower_snake_case`], `.`) are consumed rather than copied
//! through; everything else is processed byte-wise over ASCII, with
//! non-ASCII passed through unchanged.

/// Preallocate a single buffer per call sized to avoid repeated
/// reallocation during the case walk.
fn with_capacity_for(input: &str) -> String {
    String::with_capacity(input.len() * 2 + 1)
}

/// Guarantee that no transformer output starts with a digit.
/// Valid ASN.1 identifiers never do (lexically they start with a letter),
/// but this keeps the guarantee total rather than precondition-dependent.
fn guard_leading_digit(mut s: String) -> String {
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s
}

/// ASN.1 mixed-case → Protobuf `PascalCase`.
///
/// Collapses all-caps runs (`PDU-ID` → `PduId`) and promotes
/// kebab/snake-separated input to Pascal case. Idempotent on input
/// that is already Pascal-cased with no separators.
#[must_use]
pub fn pascal_case(input: &str) -> String {
    let mut out = with_capacity_for(input);
    let mut last_was_upper = false;
    let mut force_upper = false;
    let mut first = true;

    for c in input.chars() {
        if c == '-' || c == '&' || c == '_' {
            force_upper = true;
            continue;
        }
        if !c.is_ascii() {
            out.push(c);
            last_was_upper = false;
            force_upper = false;
            first = false;
            continue;
        }
        if first || force_upper {
            out.push(c.to_ascii_uppercase());
            last_was_upper = true;
            force_upper = false;
            first = false;
            continue;
        }
        if c.is_ascii_uppercase() {
            if last_was_upper {
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c);
                last_was_upper = true;
            }
        } else {
            out.push(c);
            last_was_upper = false;
        }
    }

    guard_leading_digit(out)
}

/// ASN.1 mixed-case → Protobuf `lower_snake_case`.
///
/// Drops a leading `&` (information-object field reference sigil),
/// converts internal `-`/`.` to `_`, and inserts `_` before an
/// uppercase letter that does not continue a run already started by a
/// separator or a leading capital. Idempotent on already-snake input.
#[must_use]
pub fn lower_snake_case(input: &str) -> String {
    let mut out = with_capacity_for(input);
    let mut last_was_upper = false;
    let mut first = true;
    let mut skip_leading_amp = true;

    for c in input.chars() {
        if skip_leading_amp {
            skip_leading_amp = false;
            if c == '&' {
                continue;
            }
        }
        if c == '-' || c == '.' {
            out.push('_');
            last_was_upper = true;
            first = false;
            continue;
        }
        if c == '_' {
            out.push('_');
            last_was_upper = true;
            first = false;
            continue;
        }
        if !c.is_ascii() {
            out.push(c);
            last_was_upper = false;
            first = false;
            continue;
        }
        if first {
            out.push(c.to_ascii_lowercase());
            last_was_upper = c.is_ascii_uppercase();
            first = false;
            continue;
        }
        if c.is_ascii_uppercase() {
            if !last_was_upper {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            last_was_upper = true;
        } else {
            out.push(c);
            last_was_upper = false;
        }
    }

    guard_leading_digit(out)
}

/// ASN.1 mixed-case → Protobuf `SCREAMING_SNAKE_CASE`.
///
/// Same separator handling as [`pascal_case`]/[`lower_snake_case`]
/// (each separator becomes a single `_`); every source-uppercase letter
/// that follows any earlier letter gets an inserted `_` before it; all
/// letters are uppercased.
#[must_use]
pub fn screaming_snake_case(input: &str) -> String {
    let mut out = with_capacity_for(input);
    let mut prev_was_letter = false;
    let mut first = true;

    for c in input.chars() {
        if c == '-' || c == '_' || c == '&' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_was_letter = false;
            first = false;
            continue;
        }
        if !c.is_ascii() {
            out.push(c);
            prev_was_letter = false;
            first = false;
            continue;
        }
        if c.is_ascii_alphabetic() {
            if c.is_ascii_uppercase() && !first && prev_was_letter {
                out.push('_');
            }
            out.push(c.to_ascii_uppercase());
            prev_was_letter = true;
        } else {
            out.push(c);
            prev_was_letter = false;
        }
        first = false;
    }

    guard_leading_digit(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_collapses_allcaps_run() {
        assert_eq!(pascal_case("PDU-ID"), "PduId");
    }

    #[test]
    fn pascal_promotes_kebab() {
        assert_eq!(pascal_case("my-field"), "MyField");
    }

    #[test]
    fn pascal_is_idempotent_on_pascal_input() {
        assert_eq!(pascal_case("PduId"), "PduId");
        assert_eq!(pascal_case("MyMessage"), "MyMessage");
    }

    #[test]
    fn snake_converts_camel() {
        assert_eq!(lower_snake_case("myField"), "my_field");
    }

    #[test]
    fn snake_converts_kebab_allcaps_run() {
        assert_eq!(lower_snake_case("URI-Path"), "uri_path");
    }

    #[test]
    fn snake_drops_leading_ampersand() {
        assert_eq!(lower_snake_case("&ObjectSetRef"), "object_set_ref");
    }

    #[test]
    fn snake_is_idempotent_on_snake_input() {
        assert_eq!(lower_snake_case("my_field"), "my_field");
        assert_eq!(lower_snake_case("already_snake_case"), "already_snake_case");
    }

    #[test]
    fn screaming_inserts_underscores_at_word_boundaries() {
        assert_eq!(screaming_snake_case("myEnumVal"), "MY_ENUM_VAL");
    }

    #[test]
    fn screaming_handles_separators() {
        assert_eq!(screaming_snake_case("first-value"), "FIRST_VALUE");
    }

    #[test]
    fn none_of_the_transforms_start_with_a_digit() {
        assert_eq!(pascal_case("2value").chars().next(), Some('_'));
        assert_eq!(lower_snake_case("2value").chars().next(), Some('_'));
        assert_eq!(screaming_snake_case("2value").chars().next(), Some('_'));
    }

    #[test]
    fn non_ascii_passes_through_unchanged() {
        assert_eq!(pascal_case("café"), "Café");
        assert_eq!(lower_snake_case("café"), "café");
    }
}
