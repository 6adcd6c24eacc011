//! ASN.1 literal value → short text form.
//!
//! Pure, total rendering used both directly (constant-value fields) and
//! as a leaf operation inside the constraint compiler (for single-value
//! and range constraints).

use asn2proto_core::ast::Value;

/// Render a value for embedding inside a `validate.v1` rule string or a
/// constant-value field rule.
///
/// `MAX`/`MIN` render as empty strings here — the constraint compiler
/// special-cases them at range endpoints because their meaning depends
/// on the active domain, not on the value alone.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Real(f) => format!("{f:.6}"),
        Value::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Value::String(s) => render_quoted_string(s),
        Value::BitString { bits } => render_bitstring(bits),
        Value::Tuple(hi, lo) => format!("{{{hi}, {lo}}}"),
        Value::Quadruple(a, b, c, d) => format!("{{{a}, {b}, {c}, {d}}}"),
        Value::Referenced(components) => components.join("."),
        Value::ChoiceIdentifier { tag, value } => format!("{tag}{}", render_value(value)),
        Value::Null => "NULL".to_string(),
        Value::NoValue | Value::Max | Value::Min => String::new(),
        Value::Unparsed(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Double-quote a string, escaping every embedded `"` as `\"` and
/// passing every other character through unchanged.
///
/// Escapes quotes rather than reproducing a double-copy/drop quirk a
/// naive per-character quote-detection loop could fall into; the intent
/// here is always "escape quotes, pass everything else through".
fn render_quoted_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Render a `BIT STRING` literal: binary form when the bit length is
/// not a multiple of 8, hex form otherwise.
fn render_bitstring(bits: &[bool]) -> String {
    if bits.len() % 8 != 0 {
        let digits: String = bits.iter().map(|&b| if b { '1' } else { '0' }).collect();
        format!("'{digits}'B")
    } else {
        let mut hex = String::with_capacity(bits.len() / 4);
        for byte in bits.chunks(8) {
            let mut v = 0u8;
            for &bit in byte {
                v = (v << 1) | u8::from(bit);
            }
            hex.push_str(&format!("{v:02X}"));
        }
        format!("'{hex}'H")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_renders_decimal() {
        assert_eq!(render_value(&Value::Integer(42)), "42");
        assert_eq!(render_value(&Value::Integer(-7)), "-7");
    }

    #[test]
    fn boolean_renders_upper() {
        assert_eq!(render_value(&Value::Boolean(true)), "TRUE");
        assert_eq!(render_value(&Value::Boolean(false)), "FALSE");
    }

    #[test]
    fn string_escapes_every_quote() {
        assert_eq!(render_value(&Value::String("plain".into())), "\"plain\"");
        assert_eq!(
            render_value(&Value::String(r#"say "hi" twice "ok""#.into())),
            r#""say \"hi\" twice \"ok\"""#
        );
    }

    #[test]
    fn bitstring_picks_binary_or_hex_by_length() {
        // 4 bits, not a multiple of 8 -> binary form.
        assert_eq!(render_value(&Value::BitString { bits: vec![true, false, true, true] }), "'1011'B");
        // 8 bits -> hex form.
        assert_eq!(
            render_value(&Value::BitString {
                bits: vec![true, false, true, false, false, false, true, true]
            }),
            "'A3'H"
        );
    }

    #[test]
    fn tuple_and_quadruple_render_braced() {
        assert_eq!(render_value(&Value::Tuple(1, 2)), "{1, 2}");
        assert_eq!(render_value(&Value::Quadruple(10, 0, 0, 1)), "{10, 0, 0, 1}");
    }

    #[test]
    fn referenced_dot_joins_components() {
        assert_eq!(
            render_value(&Value::Referenced(vec!["Outer".into(), "inner".into()])),
            "Outer.inner"
        );
    }

    #[test]
    fn choice_identifier_concatenates_tag_and_value() {
        let v = Value::ChoiceIdentifier { tag: "ok".into(), value: Box::new(Value::Integer(3)) };
        assert_eq!(render_value(&v), "ok3");
    }

    #[test]
    fn max_min_and_novalue_render_empty_outside_int32_context() {
        assert_eq!(render_value(&Value::Max), "");
        assert_eq!(render_value(&Value::Min), "");
        assert_eq!(render_value(&Value::NoValue), "");
    }
}
