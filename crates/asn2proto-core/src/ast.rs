//! The ASN.1 expression tree consumed by the translator.
//!
//! This is the input contract handed down by the external ASN.1 lexer,
//! parser and fixer passes (out of scope for this crate): by the time an
//! [`Expr`] reaches the translator, references have been resolved and
//! `terminal type` has already been computed where needed. Nothing in
//! this module performs parsing or validation — it only names the shape
//! of a fully-elaborated module.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What role an [`Expr`] node plays: a type definition, a value, a value
/// set, or a bare reference to one of the above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetaType {
    /// A type definition (`Foo ::= SEQUENCE { ... }`).
    Type,
    /// A value definition (`maxRetries INTEGER ::= 7`).
    Value,
    /// A value set definition (`AllowedSizes INTEGER ::= { 1 | 2 | 3 }`).
    ValueSet,
    /// A bare reference to a type, value, or value set defined elsewhere.
    TypeRef,
}

/// The ASN.1 built-in or constructed type a node denotes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExprType {
    /// `INTEGER`.
    Integer,
    /// `BOOLEAN`.
    Boolean,
    /// `IA5String`.
    Ia5String,
    /// `BMPString`.
    BmpString,
    /// `UTF8String`.
    Utf8String,
    /// `TeletexString`.
    TeletexString,
    /// `OBJECT IDENTIFIER`.
    ObjectIdentifier,
    /// `BIT STRING`.
    BitString,
    /// `ENUMERATED`.
    Enumerated,
    /// `SEQUENCE`.
    Sequence,
    /// `SEQUENCE OF`.
    SequenceOf,
    /// `CHOICE`.
    Choice,
    /// A reference to another named type, value, or value set.
    Reference,
    /// An information object class definition (`FOO-CLASS ::= CLASS { ... }`).
    ClassDef,
    /// A member of an `ENUMERATED` list (`first-value(0)`).
    UniverVal,
    /// The extension marker `...` inside a constructed type.
    Extensible,
}

/// An ASN.1 literal or referenced value.
///
/// Produced by the parser for `VALUE` nodes, embedded inside constraints,
/// and rendered by `asn2proto-translate::values` for inclusion in
/// `validate.v1` rule strings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// A signed integer literal.
    Integer(i64),
    /// A floating point literal (ASN.1 `REAL`).
    Real(f64),
    /// A `BOOLEAN` literal.
    Boolean(bool),
    /// A quoted string literal (any of the ASN.1 string types).
    String(String),
    /// A `BIT STRING` literal: raw bits, most significant bit first.
    BitString {
        /// The bits, one `bool` per bit, MSB first.
        bits: Vec<bool>,
    },
    /// A two-component tuple value (nibble pair packed in a byte).
    Tuple(u8, u8),
    /// A four-component quadruple value (four packed bytes, e.g. an IPv4 address).
    Quadruple(u8, u8, u8, u8),
    /// A value defined by reference, as an ordered list of component names.
    Referenced(Vec<String>),
    /// A `CHOICE` value: the selected alternative's tag plus its value.
    ChoiceIdentifier {
        /// The chosen alternative's identifier.
        tag: String,
        /// The value carried by the chosen alternative.
        value: Box<Value>,
    },
    /// The ASN.1 `NULL` value.
    Null,
    /// No value was supplied (an absent OPTIONAL/DEFAULT).
    NoValue,
    /// The constraint endpoint keyword `MAX`.
    Max,
    /// The constraint endpoint keyword `MIN`.
    Min,
    /// A value the parser could not interpret further; raw source bytes.
    Unparsed(Vec<u8>),
}

/// A single ASN.1 subtype constraint node.
///
/// Constraint trees are recursive: most kinds wrap or combine other
/// constraints. `subconstraints` models the `perhaps_subconstraints`
/// trailing clause the parser attaches to a constraint (e.g. an
/// `INTERSECTION` applied after a `SIZE`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    /// The constraint's own kind and operands.
    pub kind: ConstraintKind,
    /// A constraint appended after this one, separated by a single space
    /// at render time, or `None` if there is no trailing clause.
    pub subconstraints: Option<Box<Constraint>>,
}

impl Constraint {
    /// Build a bare constraint node with no trailing subconstraints.
    #[must_use]
    pub fn new(kind: ConstraintKind) -> Self {
        Constraint { kind, subconstraints: None }
    }

    /// Attach a trailing subconstraint, consuming and returning `self`.
    #[must_use]
    pub fn with_subconstraints(mut self, sub: Constraint) -> Self {
        self.subconstraints = Some(Box::new(sub));
        self
    }
}

/// Whether a range endpoint is open (`(`/`)`) or closed (`[`/`]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Endpoint {
    /// Inclusive endpoint.
    Closed,
    /// Exclusive endpoint.
    Open,
}

/// The kind of a single constraint node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstraintKind {
    /// A single permitted value.
    SingleValue(Value),
    /// A closed or half-open range `lo .. hi`.
    Range {
        /// Lower bound.
        lo: Value,
        /// Upper bound.
        hi: Value,
        /// Lower endpoint kind.
        lo_endpoint: Endpoint,
        /// Upper endpoint kind.
        hi_endpoint: Endpoint,
    },
    /// `SIZE(...)`.
    Size(Box<Constraint>),
    /// `FROM(...)` (a permitted-alphabet constraint).
    From(Box<Constraint>),
    /// A union of alternative constraints (`UNI`).
    Union(Vec<Constraint>),
    /// An intersection of constraints (`INT`).
    Intersection(Vec<Constraint>),
    /// A set complement, `left EXCEPT right` (`EXC`).
    Complement {
        /// The base set.
        left: Box<Constraint>,
        /// The excluded set.
        right: Box<Constraint>,
    },
    /// `ALL EXCEPT inner`.
    AllExcept(Box<Constraint>),
    /// The extension marker `...` inside a constraint.
    Extensible,
    /// `WITH COMPONENT` / `WITH COMPONENTS` applied to a constructed type.
    WithComponents(Vec<Constraint>),
    /// `CONTAINING <type>`.
    Containing(String),
    /// `PATTERN <value>`.
    Pattern(Value),
}

/// A formal parameter of a parameterized ASN.1 type (`Foo{Governor:arg}`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Param {
    /// The governor, i.e. the parameter's own type/class (may be empty).
    pub governor: String,
    /// The argument name bound in the parameterized body.
    pub argument: String,
}

/// One cell in an information-object class table row.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IocCell {
    /// The cell's value, if any was supplied.
    pub value: Option<Value>,
    /// Whether this cell introduces a new field reference (vs. reusing one
    /// already emitted by an earlier row).
    pub new_ref: bool,
}

/// One row of an information-object class table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IocRow {
    /// The row's cells, in column order.
    pub cells: Vec<IocCell>,
}

/// An information-object class table: rows of cells, each cell optionally
/// naming the field it should become when expanded.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IocTable {
    /// Column identifiers, in declaration order.
    pub columns: Vec<String>,
    /// Table rows.
    pub rows: Vec<IocRow>,
}

/// A single node of the ASN.1 expression tree.
///
/// Node shape is deliberately permissive — not every field is meaningful
/// for every `(meta_type, expr_type)` combination, matching the source
/// grammar this tree is elaborated from. `asn2proto_translate::translate`
/// disambiguates by `(meta_type, expr_type)` priority.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expr {
    /// The node's identifier, if named (`None` for anonymous members).
    pub ident: Option<String>,
    /// What role this node plays.
    pub meta_type: MetaType,
    /// What ASN.1 type or construct this node denotes.
    pub expr_type: ExprType,
    /// Ordered child members (`SEQUENCE`/`CHOICE` components, `ENUMERATED`
    /// members, etc).
    pub members: Vec<Expr>,
    /// The node's subtype constraint tree, if constrained.
    pub constraint: Option<Constraint>,
    /// The node's value, for `MetaType::Value` nodes.
    pub value: Option<Value>,
    /// An ordered list of referenced component names, for `REFERENCE` nodes.
    pub reference: Option<Vec<String>>,
    /// Formal parameters, for parameterized type definitions.
    pub parameters: Option<Vec<Param>>,
    /// Specialization clones produced by parameter substitution. When
    /// non-empty, the template itself is never emitted.
    pub specializations: Vec<Expr>,
    /// An attached information-object class table, for class-governed
    /// value definitions.
    pub ioc_table: Option<IocTable>,
    /// The source file this node was parsed from.
    pub source_file: String,
    /// The source line this node was parsed from.
    pub line: u32,
    /// A unique index assigned by the parser, stable across a translation
    /// run. Used to disambiguate synthesized type names.
    pub index: u32,
}

impl Expr {
    /// Build a minimal node with the given meta/expr type and no name.
    ///
    /// Intended for tests and fixtures; production ASTs are built by the
    /// external parser.
    #[must_use]
    pub fn new(meta_type: MetaType, expr_type: ExprType) -> Self {
        Expr {
            ident: None,
            meta_type,
            expr_type,
            members: Vec::new(),
            constraint: None,
            value: None,
            reference: None,
            parameters: None,
            specializations: Vec::new(),
            ioc_table: None,
            source_file: String::new(),
            line: 0,
            index: 0,
        }
    }

    /// Set the identifier, consuming and returning `self`.
    #[must_use]
    pub fn named(mut self, ident: impl Into<String>) -> Self {
        self.ident = Some(ident.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_expr_has_no_identifier_by_default() {
        let e = Expr::new(MetaType::Type, ExprType::Integer);
        assert_eq!(e.ident, None);
        assert!(e.members.is_empty());
        assert!(e.specializations.is_empty());
    }

    #[test]
    fn named_sets_identifier() {
        let e = Expr::new(MetaType::Type, ExprType::Integer).named("Age");
        assert_eq!(e.ident.as_deref(), Some("Age"));
    }

    #[test]
    fn constraint_with_subconstraints_chains() {
        let c = Constraint::new(ConstraintKind::SingleValue(Value::Integer(1)))
            .with_subconstraints(Constraint::new(ConstraintKind::Extensible));
        assert!(matches!(
            c.subconstraints.as_deref(),
            Some(Constraint { kind: ConstraintKind::Extensible, .. })
        ));
    }
}
