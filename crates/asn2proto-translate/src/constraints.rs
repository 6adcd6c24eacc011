//! ASN.1 subtype constraint → `validate.v1` rule expression.
//!
//! [`compile`] does not splice fragments of text together while
//! recursing. It builds a [`CompiledConstraint`] — key/value pairs, a
//! raw textual fragment, or a sequence of sub-results joined by a
//! separator — and text is produced only once, by
//! [`CompiledConstraint::render`], at the call site that actually needs
//! a string.

use asn2proto_core::ast::{Constraint, ConstraintKind, Value};

use crate::error::{TranslateError, Result};
use crate::values::render_value;

/// Which value domain a constraint is being compiled for — selects
/// between the `gte`/`lte`/… numeric rule keys and the `min_len`/
/// `max_len` string-length rule keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    /// 32-bit integer domain; range endpoints use `gt`/`gte`/`lt`/`lte`.
    Int32,
    /// String length domain; range endpoints use `min_len`/`max_len`.
    StringLen,
}

/// A compiled constraint, not yet serialized to text.
#[derive(Clone, Debug, PartialEq)]
pub enum CompiledConstraint {
    /// No rule text (e.g. the extension marker `...`).
    Empty,
    /// A pre-formatted fragment that doesn't decompose into key/value
    /// pairs (`FROM ...`, `ALL EXCEPT ...`, `PATTERN ...`, …).
    Raw(String),
    /// `key: value` pairs, rendered comma-separated.
    KeyValues(Vec<(&'static str, String)>),
    /// Sub-results joined by a separator (`,` for unions, `^` for
    /// intersections, a single space for appended subconstraints).
    Seq(Vec<CompiledConstraint>, &'static str),
}

impl CompiledConstraint {
    /// Serialize to the final rule-expression text.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            CompiledConstraint::Empty => String::new(),
            CompiledConstraint::Raw(s) => s.clone(),
            CompiledConstraint::KeyValues(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join(", "),
            CompiledConstraint::Seq(items, sep) => items
                .iter()
                .map(CompiledConstraint::render)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(sep),
        }
    }
}

/// Render a range endpoint value, special-casing `MAX`/`MIN`: `MIN` is
/// always `0`; `MAX` is `2147483647` under the int32 domain and
/// otherwise rendered through the normal value renderer.
fn render_endpoint(value: &Value, domain: Domain) -> String {
    match (value, domain) {
        (Value::Min, _) => "0".to_string(),
        (Value::Max, Domain::Int32) => "2147483647".to_string(),
        _ => render_value(value),
    }
}

/// Compile a constraint tree into a [`CompiledConstraint`] under the
/// given domain, including any trailing `subconstraints` clause (joined
/// by a single space).
///
/// # Errors
///
/// Returns [`TranslateError::MalformedConstraint`] for shapes that are
/// legal at the type level (a `Vec` can be empty) but semantically
/// invalid — e.g. a union or intersection with no operands. These
/// indicate a bug in the upstream parser/fixer, not an unsupported
/// legal construct.
pub fn compile(constraint: &Constraint, domain: Domain) -> Result<CompiledConstraint> {
    let head = compile_kind(&constraint.kind, domain)?;
    match &constraint.subconstraints {
        Some(sub) => {
            let tail = compile(sub, domain)?;
            Ok(CompiledConstraint::Seq(vec![head, tail], " "))
        }
        None => Ok(head),
    }
}

fn compile_kind(kind: &ConstraintKind, domain: Domain) -> Result<CompiledConstraint> {
    match kind {
        ConstraintKind::SingleValue(v) => Ok(match domain {
            Domain::Int32 => CompiledConstraint::Raw(render_endpoint(v, domain)),
            Domain::StringLen => {
                let rendered = render_endpoint(v, domain);
                CompiledConstraint::KeyValues(vec![
                    ("min_len", rendered.clone()),
                    ("max_len", rendered),
                ])
            }
        }),

        ConstraintKind::Range { lo, hi, lo_endpoint, hi_endpoint } => {
            let lo_text = render_endpoint(lo, domain);
            let hi_text = render_endpoint(hi, domain);
            Ok(match domain {
                // String ranges always render inclusive: strict bounds
                // collapse to min_len/max_len regardless of endpoint
                // openness, since validate.v1 has no exclusive-length rule.
                Domain::StringLen => CompiledConstraint::KeyValues(vec![
                    ("min_len", lo_text),
                    ("max_len", hi_text),
                ]),
                Domain::Int32 => {
                    use asn2proto_core::ast::Endpoint::{Closed, Open};
                    let lo_key = match lo_endpoint {
                        Closed => "gte",
                        Open => "gt",
                    };
                    let hi_key = match hi_endpoint {
                        Closed => "lte",
                        Open => "lt",
                    };
                    CompiledConstraint::KeyValues(vec![(lo_key, lo_text), (hi_key, hi_text)])
                }
            })
        }

        // SIZE always measures length: the inner constraint is compiled
        // under the string-length domain regardless of the ambient domain.
        ConstraintKind::Size(inner) => compile(inner, Domain::StringLen),

        ConstraintKind::From(inner) => {
            let rendered = compile(inner, domain)?.render();
            Ok(CompiledConstraint::Raw(format!("FROM {rendered}")))
        }

        ConstraintKind::Union(items) => {
            if items.is_empty() {
                return Err(TranslateError::MalformedConstraint("empty union".into()));
            }
            let compiled = items.iter().map(|c| compile(c, domain)).collect::<Result<_>>()?;
            Ok(CompiledConstraint::Seq(compiled, ","))
        }

        ConstraintKind::Intersection(items) => {
            if items.is_empty() {
                return Err(TranslateError::MalformedConstraint("empty intersection".into()));
            }
            let compiled = items.iter().map(|c| compile(c, domain)).collect::<Result<_>>()?;
            Ok(CompiledConstraint::Seq(compiled, "^"))
        }

        ConstraintKind::Complement { left, right } => {
            let left = compile(left, domain)?.render();
            let right = compile(right, domain)?.render();
            Ok(CompiledConstraint::Raw(format!("{left} EXCEPT {right}")))
        }

        ConstraintKind::AllExcept(inner) => {
            let rendered = compile(inner, domain)?.render();
            Ok(CompiledConstraint::Raw(format!("ALL EXCEPT {rendered}")))
        }

        ConstraintKind::Extensible => Ok(CompiledConstraint::Empty),

        ConstraintKind::WithComponents(items) => {
            // Best-effort textual approximation — WITH COMPONENT(S) has
            // no validate.v1 analog.
            let rendered = items
                .iter()
                .map(|c| compile(c, domain).map(|cc| cc.render()))
                .collect::<Result<Vec<_>>>()?
                .join(", ");
            Ok(CompiledConstraint::Raw(format!("WITH COMPONENTS {{{rendered}}}")))
        }

        ConstraintKind::Containing(type_name) => {
            Ok(CompiledConstraint::Raw(format!("CONTAINING {type_name}")))
        }

        ConstraintKind::Pattern(v) => {
            Ok(CompiledConstraint::Raw(format!("PATTERN {}", render_value(v))))
        }
    }
}
