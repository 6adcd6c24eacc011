//! The expression translator — the central dispatcher.
//!
//! [`translate_expr`] walks a single ASN.1 expression and decides which
//! IR node(s) to emit, recursing on children and specializations. It
//! follows a first-match-wins priority order: each rule is tried in
//! order and, once one matches, owns the node — later rules are never
//! consulted for the same node.

use asn2proto_core::ast::{Expr, ExprType, MetaType, Param, Value};
use asn2proto_core::ir::{
    ParamKind, ProtoEnum, ProtoEnumDef, ProtoField, ProtoMessage, ProtoModule, ProtoOneof,
    ProtoParam,
};

use crate::constraints::{self, Domain};
use crate::error::{Result, TranslateError};
use crate::resolver::TerminalTypeResolver;
use crate::values::render_value;

/// Translate a single expression node into the module's IR, recursing
/// on specializations and (for constructed types) on children.
///
/// # Errors
///
/// Propagates [`TranslateError`] from the constraint compiler or from
/// an unresolved `TYPEREF` — both are the upstream parser/fixer's
/// responsibility to avoid, not something this crate can repair.
pub fn translate_expr(
    expr: &Expr,
    module: &mut ProtoModule,
    resolver: &dyn TerminalTypeResolver,
) -> Result<()> {
    // Rule 1: specializations present — recurse on each clone, never
    // emit the parametric template itself.
    if !expr.specializations.is_empty() {
        for spec in &expr.specializations {
            translate_expr(spec, module, resolver)?;
        }
        return Ok(());
    }

    // Rule 2: no identifier — nothing to name the output after.
    let Some(ident) = expr.ident.clone() else {
        return Ok(());
    };

    // Rule 3: ENUMERATED.
    if expr.expr_type == ExprType::Enumerated {
        translate_enumerated(&ident, expr, module);
        return Ok(());
    }

    // Rule 4: VALUE meta-type.
    if expr.meta_type == MetaType::Value {
        return translate_value(&ident, expr, module);
    }

    // Rule 5: INTEGER VALUE SET.
    if expr.meta_type == MetaType::ValueSet && expr.expr_type == ExprType::Integer {
        translate_integer_value_set(&ident, expr, module)?;
        return Ok(());
    }

    // Rule 6: TYPE meta-type, non-constructed.
    if expr.meta_type == MetaType::Type {
        if let Some(scalar) = scalar_field_type(expr.expr_type) {
            translate_scalar_type(&ident, expr, scalar, module)?;
            return Ok(());
        }
    }

    // Rule 7: SEQUENCE / SEQUENCE OF.
    if matches!(expr.expr_type, ExprType::Sequence | ExprType::SequenceOf) {
        translate_sequence(&ident, expr, module)?;
        return Ok(());
    }

    // Rule 8: CHOICE.
    if expr.expr_type == ExprType::Choice {
        translate_choice(&ident, expr, module)?;
        return Ok(());
    }

    // Rule 9: CLASSDEF — no Protobuf analog.
    if expr.expr_type == ExprType::ClassDef {
        return Ok(());
    }

    // Rule 10: TYPEREF.
    if expr.meta_type == MetaType::TypeRef {
        return translate_typeref(&ident, expr, module, resolver);
    }

    // Rule 11: VALUESET, non-integer — no output.
    if expr.meta_type == MetaType::ValueSet {
        return Ok(());
    }

    // Rule 12: anything else.
    eprintln!(
        "asn2proto: no translation rule matched `{ident}` ({:?}/{:?}); skipping",
        expr.meta_type, expr.expr_type
    );
    Ok(())
}

/// Scalar field type for a non-constructed ASN.1 type, or `None` if the
/// type is constructed (SEQUENCE, CHOICE, …) or otherwise has no
/// standalone scalar mapping.
fn scalar_field_type(expr_type: ExprType) -> Option<&'static str> {
    match expr_type {
        ExprType::Integer => Some("int32"),
        ExprType::Boolean => Some("bool"),
        ExprType::Ia5String | ExprType::BmpString | ExprType::Utf8String | ExprType::TeletexString => {
            Some("string")
        }
        ExprType::BitString => Some("BitString"),
        ExprType::ObjectIdentifier => Some("BasicOid"),
        _ => None,
    }
}

/// The constraint domain a scalar type's own constraints compile under,
/// or `None` if the type has no validate.v1 analog — such constraints
/// degrade to a comment instead of a rule (full constraint fidelity is
/// out of scope for types with no rule analog).
fn scalar_domain(expr_type: ExprType) -> Option<Domain> {
    match expr_type {
        ExprType::Integer => Some(Domain::Int32),
        ExprType::Ia5String | ExprType::BmpString | ExprType::Utf8String | ExprType::TeletexString => {
            Some(Domain::StringLen)
        }
        _ => None,
    }
}

fn attach_params(msg: &mut ProtoMessage, expr: &Expr) {
    let Some(params) = &expr.parameters else { return };
    for p in params {
        msg.comments.push(format!("Param {}:{}", p.governor, p.argument));
        msg.params.push(ProtoParam { name: p.argument.clone(), kind: infer_param_kind(p) });
    }
}

/// Infer a formal parameter's kind from its governor/argument shape: an
/// empty governor is a type parameter, a lowercase-leading argument is a
/// value parameter, anything else is a value-set parameter.
fn infer_param_kind(p: &Param) -> ParamKind {
    if p.governor.is_empty() {
        ParamKind::Type
    } else if p.argument.chars().next().is_some_and(|c| c.is_lowercase()) {
        ParamKind::Value
    } else {
        ParamKind::ValueSet
    }
}

/// Build a message stub, carrying the originating node's source line and
/// parser-assigned unique index through for traceability and TYPEREF
/// name synthesis.
fn new_message(ident: &str, expr: &Expr) -> ProtoMessage {
    let mut msg = ProtoMessage::new(ident);
    msg.spec_index = expr.line;
    msg.type_unique_index = expr.index;
    msg
}

fn push_error_message(module: &mut ProtoModule, expr: &Expr, ident: &str, reason: &str) {
    eprintln!("asn2proto: error translating `{ident}`: {reason}");
    let mut msg = new_message(ident, expr);
    msg.comments.push("Error.".to_string());
    module.push_message(msg);
}

fn translate_enumerated(ident: &str, expr: &Expr, module: &mut ProtoModule) {
    let mut e = ProtoEnum::new(ident);
    e.comments.push(format!("enumerated from {}:{}", expr.source_file, expr.line));
    for member in &expr.members {
        if member.expr_type != ExprType::UniverVal {
            continue;
        }
        let name = member.ident.clone().unwrap_or_default();
        let def = match member.value {
            Some(Value::Integer(v)) if v >= 0 => ProtoEnumDef::explicit(name, v),
            _ => ProtoEnumDef::auto(name),
        };
        e.push_def(def);
    }
    module.push_enum(e);
}

fn translate_value(ident: &str, expr: &Expr, module: &mut ProtoModule) -> Result<()> {
    match expr.expr_type {
        ExprType::Integer => {
            let Some(Value::Integer(v)) = &expr.value else {
                push_error_message(module, expr, ident, "VALUE/INTEGER node missing integer value");
                return Ok(());
            };
            let mut msg = new_message(ident, expr);
            msg.push_field(ProtoField::new("value", "int32").with_rules(format!("int32.const = {v}")));
            module.push_message(msg);
            Ok(())
        }
        ExprType::Reference => match &expr.value {
            Some(Value::Integer(v)) => {
                let mut msg = new_message(ident, expr);
                msg.push_field(ProtoField::new("value", "int32").with_rules(format!("int32.const = {v}")));
                module.push_message(msg);
                Ok(())
            }
            Some(v @ Value::String(_)) => {
                let mut msg = new_message(ident, expr);
                msg.push_field(
                    ProtoField::new("value", "string")
                        .with_rules(format!("string.const = {}", render_value(v))),
                );
                module.push_message(msg);
                Ok(())
            }
            Some(Value::Unparsed(_)) if expr.ioc_table.is_some() => {
                translate_ioc_table(ident, expr, module)
            }
            _ => {
                push_error_message(module, expr, ident, "unhandled VALUE/REFERENCE value kind");
                Ok(())
            }
        },
        _ => {
            push_error_message(module, expr, ident, "unhandled VALUE meta-type expr_type");
            Ok(())
        }
    }
}

/// Information-object-table expander: one message field per `new_ref` cell.
fn translate_ioc_table(ident: &str, expr: &Expr, module: &mut ProtoModule) -> Result<()> {
    let table = expr.ioc_table.as_ref().expect("checked by caller");
    let mut msg = new_message(ident, expr);
    for row in &table.rows {
        for cell in &row.cells {
            if !cell.new_ref {
                continue;
            }
            let Some(value) = &cell.value else { continue };
            let cell_ident = cell_value_identifier(value);
            let field_name = format!("{ident}-{cell_ident}");
            let field = if let Value::Integer(v) = value {
                ProtoField::new(field_name, "int32").with_rules(format!("int32.const = {v}"))
            } else {
                let ty = match cell_ident.as_str() {
                    "INTEGER" => "int32".to_string(),
                    "REAL" => "float".to_string(),
                    other => other.to_string(),
                };
                ProtoField::new(field_name, ty)
            };
            msg.push_field(field);
        }
    }
    module.push_message(msg);
    Ok(())
}

fn cell_value_identifier(value: &Value) -> String {
    match value {
        Value::Referenced(components) => components.last().cloned().unwrap_or_default(),
        Value::String(s) => s.clone(),
        other => render_value(other),
    }
}

fn translate_integer_value_set(ident: &str, expr: &Expr, module: &mut ProtoModule) -> Result<()> {
    let mut msg = new_message(ident, expr);
    let mut field = ProtoField::new("value", "int32");
    if let Some(constraint) = &expr.constraint {
        let compiled = constraints::compile(constraint, Domain::Int32)?;
        field = field.with_rules(format!("int32 = {{in: [{}]}}", compiled.render()));
    }
    msg.push_field(field);
    attach_params(&mut msg, expr);
    module.push_message(msg);
    Ok(())
}

fn translate_scalar_type(
    ident: &str,
    expr: &Expr,
    scalar: &'static str,
    module: &mut ProtoModule,
) -> Result<()> {
    let mut field = ProtoField::new("value", scalar);
    if let Some(constraint) = &expr.constraint {
        match scalar_domain(expr.expr_type) {
            Some(domain) => {
                let compiled = constraints::compile(constraint, domain)?;
                field = field.with_rules(format!("{scalar} = {{{}}}", compiled.render()));
            }
            // No validate.v1 analog for this type's constraints — degrade
            // with a comment rather than silently dropping it.
            None => field.comment = Some("constraint has no validate.v1 analog".to_string()),
        }
    }
    let mut msg = new_message(ident, expr);
    msg.push_field(field);
    attach_params(&mut msg, expr);
    module.push_message(msg);
    Ok(())
}

fn translate_sequence(ident: &str, expr: &Expr, module: &mut ProtoModule) -> Result<()> {
    let mut msg = new_message(ident, expr);
    for child in &expr.members {
        if let Some(mut field) = build_child_field(child)? {
            if expr.expr_type == ExprType::SequenceOf {
                field.repeated = true;
            }
            msg.push_field(field);
        }
    }
    attach_params(&mut msg, expr);
    module.push_message(msg);
    Ok(())
}

fn translate_choice(ident: &str, expr: &Expr, module: &mut ProtoModule) -> Result<()> {
    let mut msg = new_message(ident, expr);
    let mut oneof = ProtoOneof::new(ident);
    for child in &expr.members {
        if let Some(field) = build_child_field(child)? {
            oneof.push_field(field);
        }
    }
    msg.push_oneof(oneof);
    attach_params(&mut msg, expr);
    module.push_message(msg);
    Ok(())
}

fn translate_typeref(
    ident: &str,
    expr: &Expr,
    module: &mut ProtoModule,
    resolver: &dyn TerminalTypeResolver,
) -> Result<()> {
    let resolved = resolver
        .resolve_terminal(expr)
        .ok_or_else(|| TranslateError::UnresolvedTypeRef(ident.to_string()))?;
    let ty = format!("{}{:03}", resolved.name, resolved.unique_index);
    let mut msg = new_message(ident, expr);
    msg.push_field(ProtoField::new("value", ty));
    attach_params(&mut msg, expr);
    module.push_message(msg);
    Ok(())
}

/// Name a child's field the way a SEQUENCE/CHOICE child keeps its
/// identifier unchanged at build time — casing happens at render.
fn field_name(child: &Expr) -> String {
    child.ident.clone().unwrap_or_else(|| "value".to_string())
}

fn referenced_name(components: &[String]) -> &str {
    components.last().map_or("value", String::as_str)
}

/// Build the field for a single SEQUENCE/CHOICE member, dispatching on
/// the child's ASN.1 type. Returns `None` for members that are skipped
/// entirely (`UNIVERVAL`, the extension marker).
fn build_child_field(child: &Expr) -> Result<Option<ProtoField>> {
    match child.expr_type {
        ExprType::UniverVal | ExprType::Extensible => Ok(None),

        ExprType::BitString => Ok(Some(ProtoField::new(field_name(child), "BitString"))),
        ExprType::ObjectIdentifier => Ok(Some(ProtoField::new(field_name(child), "BasicOid"))),
        ExprType::Boolean => Ok(Some(ProtoField::new(field_name(child), "bool"))),

        ExprType::Utf8String | ExprType::TeletexString => {
            let mut field = ProtoField::new(field_name(child), "string");
            if let Some(c) = &child.constraint {
                let compiled = constraints::compile(c, Domain::StringLen)?;
                field = field.with_rules(format!("string = {{{}}}", compiled.render()));
            }
            Ok(Some(field))
        }

        ExprType::SequenceOf => {
            let ty = child
                .members
                .first()
                .and_then(|m| m.reference.as_deref())
                .map(referenced_name)
                .unwrap_or("value")
                .to_string();
            Ok(Some(ProtoField::new(field_name(child), ty).repeated()))
        }

        ExprType::Reference => {
            let ty = child.reference.as_deref().map(referenced_name).unwrap_or("value").to_string();
            Ok(Some(ProtoField::new(field_name(child), ty)))
        }

        // Catch-all default: int32, with constraints compiled the same
        // way a top-level constrained INTEGER is. A constrained INTEGER
        // member is common enough that silently
        // dropping its constraint here would be worse than extending
        // the one child-constraint case called out explicitly.
        _ => {
            let mut field = ProtoField::new(field_name(child), "int32");
            if let Some(c) = &child.constraint {
                let compiled = constraints::compile(c, Domain::Int32)?;
                field = field.with_rules(format!("int32 = {{{}}}", compiled.render()));
            }
            Ok(Some(field))
        }
    }
}
