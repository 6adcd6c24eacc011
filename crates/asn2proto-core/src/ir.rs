//! The Protobuf intermediate representation the translator builds.
//!
//! IR nodes are a strict tree: a [`ProtoModule`] owns its enums, messages
//! and imports; a [`ProtoMessage`] owns its fields and oneofs; a
//! [`ProtoEnum`] owns its defs; a [`ProtoOneof`] owns its fields. There
//! are no back-references and no cycles, so ordinary ownership (`Vec<T>`,
//! not `Rc`/`Arc`) models the whole tree.
//!
//! Insertion order is load-bearing: field ordinals and render order are
//! both derived from it, so every container exposes a `push_*` method
//! rather than a public `Vec` to keep append-only the one way in.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar Protobuf field types this translator ever emits.
///
/// A source type that names one of these verbatim is passed through
/// byte-for-byte at render time; anything else is treated as a message
/// reference and PascalCased.
pub const PROTO_SCALARS: &[&str] = &[
    "bool", "int32", "int64", "uint32", "uint64", "float", "double", "string", "bytes",
];

/// Returns true if `ty` names a Protobuf scalar verbatim.
#[must_use]
pub fn is_proto_scalar(ty: &str) -> bool {
    PROTO_SCALARS.contains(&ty)
}

/// A complete translated module, ready for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoModule {
    /// The ASN.1 module name (rendered as the `package` segment).
    pub name: String,
    /// The source filename the module was parsed from.
    pub source_file: String,
    /// The module's object identifier, as an ordered list of arcs, if any.
    pub oid: Vec<u32>,
    /// Free-form prelude comment lines, rendered above the banner.
    pub prelude_comments: Vec<String>,
    imports: Vec<ProtoImport>,
    enums: Vec<ProtoEnum>,
    messages: Vec<ProtoMessage>,
}

impl ProtoModule {
    /// Start a new, empty module.
    #[must_use]
    pub fn new(name: impl Into<String>, source_file: impl Into<String>) -> Self {
        ProtoModule { name: name.into(), source_file: source_file.into(), ..Default::default() }
    }

    /// Append an import, preserving insertion order.
    pub fn push_import(&mut self, import: ProtoImport) {
        self.imports.push(import);
    }

    /// Append an enum, preserving insertion order.
    pub fn push_enum(&mut self, e: ProtoEnum) {
        self.enums.push(e);
    }

    /// Append a message, preserving insertion order.
    pub fn push_message(&mut self, m: ProtoMessage) {
        self.messages.push(m);
    }

    /// Imports in insertion order.
    #[must_use]
    pub fn imports(&self) -> &[ProtoImport] {
        &self.imports
    }

    /// Enums in insertion order.
    #[must_use]
    pub fn enums(&self) -> &[ProtoEnum] {
        &self.enums
    }

    /// Messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[ProtoMessage] {
        &self.messages
    }

    /// Consume the module, yielding its imports, enums and messages in
    /// insertion order. Used by the destructive (`andfree`) renderer.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ProtoImport>, Vec<ProtoEnum>, Vec<ProtoMessage>) {
        (self.imports, self.enums, self.messages)
    }

    /// True if a top-level enum or message with this name is already
    /// present (invariant: top-level names are unique within a module).
    #[must_use]
    pub fn has_top_level_name(&self, name: &str) -> bool {
        self.enums.iter().any(|e| e.name == name) || self.messages.iter().any(|m| m.name == name)
    }
}

/// A single `import` declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoImport {
    /// The import path, e.g. `pkg/v1/other.proto`. Always lowercase snake_case.
    pub path: String,
    /// The imported module's OID, rendered as a trailing traceability comment.
    pub oid: Option<Vec<u32>>,
}

impl ProtoImport {
    /// Build an import with no OID comment.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        ProtoImport { path: path.into(), oid: None }
    }

    /// Attach an OID, consuming and returning `self`.
    #[must_use]
    pub fn with_oid(mut self, oid: Vec<u32>) -> Self {
        self.oid = Some(oid);
        self
    }
}

/// A `oneof`/`enum` member kind for a `ProtoParam` — currently surfaced
/// only as comments, reserved for future generics support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamKind {
    /// A type parameter.
    Type,
    /// A value parameter.
    Value,
    /// A value-set parameter.
    ValueSet,
}

/// A formal parameter surfaced on a [`ProtoMessage`] for documentation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoParam {
    /// The parameter name.
    pub name: String,
    /// The parameter's inferred kind.
    pub kind: ParamKind,
}

/// An `enum` block.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoEnum {
    /// The enum's ASN.1 identifier (PascalCased at render time).
    pub name: String,
    /// Comment lines rendered immediately above the `enum` block.
    pub comments: Vec<String>,
    defs: Vec<ProtoEnumDef>,
}

impl ProtoEnum {
    /// Start a new, empty enum.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ProtoEnum { name: name.into(), ..Default::default() }
    }

    /// Append an enum def, preserving insertion order.
    pub fn push_def(&mut self, def: ProtoEnumDef) {
        self.defs.push(def);
    }

    /// Defs in insertion order.
    #[must_use]
    pub fn defs(&self) -> &[ProtoEnumDef] {
        &self.defs
    }

    /// True if any def carries an explicit index of exactly 0.
    #[must_use]
    pub fn has_explicit_zero(&self) -> bool {
        self.defs.iter().any(|d| d.explicit_index == Some(0))
    }
}

/// A single member of an `ENUMERATED` list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoEnumDef {
    /// The member's ASN.1 identifier. Rendered SCREAMING_SNAKE_CASEd and
    /// prefixed with the owning enum's own SCREAMING_SNAKE_CASEd name
    /// (`MyEnum` + `first-value` -> `MY_ENUM_FIRST_VALUE`).
    pub name: String,
    /// The member's explicit integer value, or `None` if it should be
    /// auto-assigned from the running counter.
    pub explicit_index: Option<i64>,
}

impl ProtoEnumDef {
    /// Build a def with an explicit numeric value.
    #[must_use]
    pub fn explicit(name: impl Into<String>, index: i64) -> Self {
        ProtoEnumDef { name: name.into(), explicit_index: Some(index) }
    }

    /// Build a def whose value is assigned by the auto-index counter.
    #[must_use]
    pub fn auto(name: impl Into<String>) -> Self {
        ProtoEnumDef { name: name.into(), explicit_index: None }
    }
}

/// A `message` block.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoMessage {
    /// The message's ASN.1 identifier (PascalCased at render time).
    pub name: String,
    /// The originating AST node's source line, carried through for
    /// traceability back to the input module.
    pub spec_index: u32,
    /// The originating AST node's parser-assigned unique index — the same
    /// value a `TYPEREF` to this node resolves to and renders as a
    /// 3-digit suffix on the referencing field's type.
    pub type_unique_index: u32,
    /// Comment lines rendered immediately above the `message` block.
    pub comments: Vec<String>,
    /// Formal parameters, surfaced as comments only.
    pub params: Vec<ProtoParam>,
    fields: Vec<ProtoField>,
    oneofs: Vec<ProtoOneof>,
}

impl ProtoMessage {
    /// Start a new, empty message.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ProtoMessage { name: name.into(), ..Default::default() }
    }

    /// Append a field, preserving insertion order.
    pub fn push_field(&mut self, field: ProtoField) {
        self.fields.push(field);
    }

    /// Append a oneof, preserving insertion order.
    pub fn push_oneof(&mut self, oneof: ProtoOneof) {
        self.oneofs.push(oneof);
    }

    /// Fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[ProtoField] {
        &self.fields
    }

    /// Oneofs in insertion order.
    #[must_use]
    pub fn oneofs(&self) -> &[ProtoOneof] {
        &self.oneofs
    }
}

/// A single message or oneof field.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoField {
    /// The field's ASN.1 identifier (lower_snake_cased at render time).
    pub name: String,
    /// The field's Protobuf type: a scalar keyword, passed through
    /// verbatim, or any other string, which is PascalCased as a message
    /// reference.
    pub ty: String,
    /// Whether this field is `repeated`.
    pub repeated: bool,
    /// A pre-compiled `validate.v1` rule expression, or empty for none.
    pub rules: String,
    /// A trailing `// comment` rendered on the same line.
    pub comment: Option<String>,
}

impl ProtoField {
    /// Build a field with no rules and no trailing comment.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        ProtoField { name: name.into(), ty: ty.into(), repeated: false, rules: String::new(), comment: None }
    }

    /// Mark the field `repeated`, consuming and returning `self`.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Attach a rule expression, consuming and returning `self`.
    #[must_use]
    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = rules.into();
        self
    }
}

/// A `oneof` block nested inside a message.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtoOneof {
    /// The oneof's identifier (lower_snake_cased at render time).
    pub name: String,
    /// Comment lines rendered immediately above the `oneof` block.
    pub comments: Vec<String>,
    fields: Vec<ProtoField>,
}

impl ProtoOneof {
    /// Start a new, empty oneof.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ProtoOneof { name: name.into(), ..Default::default() }
    }

    /// Append a field, preserving insertion order.
    pub fn push_field(&mut self, field: ProtoField) {
        self.fields.push(field);
    }

    /// Fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[ProtoField] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_pass_through() {
        assert!(is_proto_scalar("int32"));
        assert!(is_proto_scalar("bytes"));
        assert!(!is_proto_scalar("MyMessage"));
    }

    #[test]
    fn module_preserves_insertion_order() {
        let mut m = ProtoModule::new("Mod", "mod.asn1");
        m.push_message(ProtoMessage::new("A"));
        m.push_message(ProtoMessage::new("B"));
        m.push_message(ProtoMessage::new("C"));
        let names: Vec<_> = m.messages().iter().map(|msg| msg.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn enum_has_explicit_zero_detection() {
        let mut e = ProtoEnum::new("Color");
        e.push_def(ProtoEnumDef::explicit("red", 1));
        assert!(!e.has_explicit_zero());
        e.push_def(ProtoEnumDef::explicit("unknown", 0));
        assert!(e.has_explicit_zero());
    }
}
