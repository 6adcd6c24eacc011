//! Proto3 text renderer.
//!
//! Two entry points share one line-building core: [`render`] borrows the
//! module and can be called repeatedly (so rendering is idempotent);
//! [`render_andfree`] takes the module by value and drops its IR after
//! the text is built, bounding peak memory to one module at a time when
//! rendering many modules back to back — the `andfree` mode.
//!
//! Walks a typed tree, pushes formatted lines into a `Vec<String>`,
//! joins once at the end.

use asn2proto_core::ir::{
    is_proto_scalar, ProtoEnum, ProtoField, ProtoImport, ProtoMessage, ProtoModule, ProtoOneof,
};

use crate::ident::{lower_snake_case, pascal_case, screaming_snake_case};

const INDENT_UNIT: &str = "    ";

/// Render-time options.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Suppresses nesting indentation (`APF_NOINDENT2`).
    pub no_indent2: bool,
    /// The tool name/version banner, e.g. `asn2proto-1.0`.
    pub tool_version: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { no_indent2: false, tool_version: "asn2proto-0.1".to_string() }
    }
}

/// Render a module to proto3 text, borrowing its IR.
#[must_use]
pub fn render(module: &ProtoModule, opts: &RenderOptions) -> String {
    let mut lines = module_header(module, opts);
    for e in module.enums() {
        lines.extend(render_enum(e, opts));
        lines.push(String::new());
    }
    for m in module.messages() {
        lines.extend(render_message(m, opts));
        lines.push(String::new());
    }
    finish(lines)
}

/// Render a module to proto3 text, consuming its IR. The owned parts are
/// dropped as soon as this call returns rather than outliving it in the
/// caller's `ProtoModule`.
#[must_use]
pub fn render_andfree(module: ProtoModule, opts: &RenderOptions) -> String {
    let mut lines = module_header(&module, opts);
    let (_imports, enums, messages) = module.into_parts();
    for e in &enums {
        lines.extend(render_enum(e, opts));
        lines.push(String::new());
    }
    for m in &messages {
        lines.extend(render_message(m, opts));
        lines.push(String::new());
    }
    finish(lines)
}

fn finish(mut lines: Vec<String>) -> String {
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Derive `srcNoRelPath`: lower_snake-case the input, strip leading
/// directory parts, then prefix literally `pkg` if the result doesn't
/// start with a lowercase ASCII letter.
fn src_no_rel_path(raw: &str) -> String {
    let snaked = lower_snake_case(raw);
    let tail = snaked.rsplit('/').next().unwrap_or(&snaked).to_string();
    if tail.starts_with(|c: char| c.is_ascii_lowercase()) {
        tail
    } else {
        format!("pkg{tail}")
    }
}

fn render_oid(oid: &[u32]) -> String {
    format!("{{ {} }}", oid.iter().map(u32::to_string).collect::<Vec<_>>().join(" "))
}

fn module_header(module: &ProtoModule, opts: &RenderOptions) -> Vec<String> {
    let mut lines: Vec<String> = module.prelude_comments.iter().map(|c| format!("// {c}")).collect();

    let modname_lc = lower_snake_case(&module.name);
    lines.push(format!("////////////////////// {modname_lc}.proto //////////////////////"));

    let tail = module.source_file.rsplit('/').next().unwrap_or(&module.source_file);
    lines.push(format!("// Protobuf generated from /{tail} by {}", opts.tool_version));
    lines.push(if module.oid.is_empty() {
        format!("// {}", module.name)
    } else {
        format!("// {} {}", module.name, render_oid(&module.oid))
    });
    lines.push(String::new());

    lines.push("syntax = \"proto3\";".to_string());
    lines.push(String::new());

    let pkg = src_no_rel_path(&module.source_file);
    lines.push(format!("package {pkg}.v1;"));
    lines.push(String::new());

    for import in module.imports() {
        lines.push(import_line(import));
    }
    lines.push("import \"validate/v1/validate.proto\";".to_string());
    lines.push(String::new());

    lines
}

fn import_line(import: &ProtoImport) -> String {
    let pkg = src_no_rel_path(&import.path);
    let mut line = format!("import \"{pkg}/v1/{}.proto\";", import.path.to_lowercase());
    if let Some(oid) = &import.oid {
        line.push_str(&format!(" // {}", render_oid(oid)));
    }
    line
}

fn indent(opts: &RenderOptions, level: usize) -> String {
    if opts.no_indent2 {
        String::new()
    } else {
        INDENT_UNIT.repeat(level)
    }
}

/// Enum emission: auto-`UNDEFINED` zero, running non-skipping counter,
/// and a warning when the counter produces a duplicate index.
fn render_enum(e: &ProtoEnum, opts: &RenderOptions) -> Vec<String> {
    let mut lines: Vec<String> = e.comments.iter().map(|c| format!("// {c}")).collect();
    let name_uc = screaming_snake_case(&e.name);
    lines.push(format!("enum {} {{", pascal_case(&e.name)));

    let mut seen_indices = std::collections::HashSet::new();
    let mut counter: i64 = 0;
    let mut note = |idx: i64| {
        if !seen_indices.insert(idx) {
            eprintln!("asn2proto: enum `{}` assigns duplicate index {idx}", e.name);
        }
    };

    if !e.has_explicit_zero() {
        note(0);
        lines.push(format!("{}{name_uc}_UNDEFINED = 0; // auto generated", indent(opts, 1)));
    }

    for def in e.defs() {
        let idx = match def.explicit_index {
            Some(v) => v,
            None => {
                let v = counter;
                counter += 1;
                v
            }
        };
        note(idx);
        let def_uc = screaming_snake_case(&def.name);
        lines.push(format!("{}{name_uc}_{def_uc} = {idx};", indent(opts, 1)));
    }

    lines.push("}".to_string());
    lines
}

fn render_message(m: &ProtoMessage, opts: &RenderOptions) -> Vec<String> {
    render_message_at(m, opts, 0)
}

fn render_message_at(m: &ProtoMessage, opts: &RenderOptions, level: usize) -> Vec<String> {
    let mut lines: Vec<String> = m.comments.iter().map(|c| format!("{}// {c}", indent(opts, level))).collect();
    lines.push(format!("{}message {} {{", indent(opts, level), pascal_case(&m.name)));

    let mut ordinal = 1u32;
    for field in m.fields() {
        lines.push(render_field(field, opts, level + 1, ordinal));
        ordinal += 1;
    }
    for oneof in m.oneofs() {
        lines.extend(render_oneof(oneof, opts, level + 1, &mut ordinal));
    }

    lines.push(format!("{}}};", indent(opts, level)));
    lines
}

fn render_oneof(oneof: &ProtoOneof, opts: &RenderOptions, level: usize, ordinal: &mut u32) -> Vec<String> {
    let mut lines: Vec<String> = oneof.comments.iter().map(|c| format!("{}// {c}", indent(opts, level))).collect();
    lines.push(format!("{}oneof {} {{", indent(opts, level), lower_snake_case(&oneof.name)));
    for field in oneof.fields() {
        lines.push(render_field(field, opts, level + 1, *ordinal));
        *ordinal += 1;
    }
    lines.push(format!("{}}}", indent(opts, level)));
    lines
}

fn render_field(field: &ProtoField, opts: &RenderOptions, level: usize, ordinal: u32) -> String {
    let ty = if is_proto_scalar(&field.ty) { field.ty.clone() } else { pascal_case(&field.ty) };
    let ty = if field.repeated { format!("repeated {ty}") } else { ty };
    let name = lower_snake_case(&field.name);

    let mut line = format!("{}{ty} {name} = {ordinal}", indent(opts, level));
    if !field.rules.is_empty() {
        line.push_str(&format!(" [(validate.v1.rules).{}]", field.rules));
    }
    line.push(';');
    if let Some(comment) = &field.comment {
        line.push_str(&format!(" // {comment}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use asn2proto_core::ir::{ProtoEnumDef, ProtoOneof, ProtoParam};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn opts() -> RenderOptions {
        RenderOptions { no_indent2: false, tool_version: "asn2proto-1.0".to_string() }
    }

    #[test]
    fn enum_s1_duplicate_index_preserved() {
        let mut e = ProtoEnum::new("MyEnum");
        e.push_def(ProtoEnumDef::explicit("first-value", 0));
        e.push_def(ProtoEnumDef::auto("second-value"));
        e.push_def(ProtoEnumDef::explicit("third-value", 5));
        let lines = render_enum(&e, &opts());
        assert_eq!(
            lines,
            vec![
                "enum MyEnum {".to_string(),
                "    MY_ENUM_FIRST_VALUE = 0;".to_string(),
                "    MY_ENUM_SECOND_VALUE = 0;".to_string(),
                "    MY_ENUM_THIRD_VALUE = 5;".to_string(),
                "}".to_string(),
            ]
        );
    }

    #[test]
    fn enum_without_explicit_zero_gets_auto_undefined() {
        let mut e = ProtoEnum::new("Color");
        e.push_def(ProtoEnumDef::explicit("red", 1));
        let lines = render_enum(&e, &opts());
        assert_eq!(lines[1], "    COLOR_UNDEFINED = 0; // auto generated");
        assert_eq!(lines[2], "    COLOR_RED = 1;");
    }

    #[test]
    fn message_s2_constrained_integer_field() {
        let mut msg = ProtoMessage::new("Age");
        msg.push_field(ProtoField::new("value", "int32").with_rules("int32 = {gte: 0, lte: 150}"));
        let lines = render_message(&msg, &opts());
        assert_eq!(lines[0], "message Age {");
        assert_eq!(lines[1], "    int32 value = 1 [(validate.v1.rules).int32 = {gte: 0, lte: 150}];");
        assert_eq!(lines[2], "};");
    }

    #[test]
    fn message_s3_sequence_with_reference() {
        let mut msg = ProtoMessage::new("Point");
        msg.push_field(ProtoField::new("x", "int32"));
        msg.push_field(ProtoField::new("label", "string").with_rules("string = {min_len: 1, max_len: 10}"));
        let lines = render_message(&msg, &opts());
        assert_eq!(lines[1], "    int32 x = 1;");
        assert_eq!(lines[2], "    string label = 2 [(validate.v1.rules).string = {min_len: 1, max_len: 10}];");
    }

    #[test]
    fn message_s4_choice_ordinals_continue_into_oneof() {
        let mut msg = ProtoMessage::new("Result");
        let mut oneof = ProtoOneof::new("Result");
        oneof.push_field(ProtoField::new("ok", "int32"));
        oneof.push_field(ProtoField::new("err", "string"));
        msg.push_oneof(oneof);
        let lines = render_message(&msg, &opts());
        assert_eq!(
            lines,
            vec![
                "message Result {".to_string(),
                "    oneof result {".to_string(),
                "        int32 ok = 1;".to_string(),
                "        string err = 2;".to_string(),
                "    }".to_string(),
                "};".to_string(),
            ]
        );
    }

    #[test]
    fn message_s5_sequence_of_repeated_field() {
        let mut msg = ProtoMessage::new("Names");
        msg.push_field(ProtoField::new("value", "string").repeated());
        let lines = render_message(&msg, &opts());
        assert_eq!(lines[1], "    repeated string value = 1;");
    }

    #[test]
    fn message_s6_integer_constant_value() {
        let mut msg = ProtoMessage::new("maxRetries");
        msg.push_field(ProtoField::new("value", "int32").with_rules("int32.const = 7"));
        let lines = render_message(&msg, &opts());
        assert_eq!(lines[0], "message MaxRetries {");
        assert_eq!(lines[1], "    int32 value = 1 [(validate.v1.rules).int32.const = 7];");
    }

    #[test]
    fn non_scalar_field_type_is_pascal_cased_as_message_ref() {
        let mut msg = ProtoMessage::new("Wrapper");
        msg.push_field(ProtoField::new("inner", "some-other-type"));
        let lines = render_message(&msg, &opts());
        assert_eq!(lines[1], "    SomeOtherType inner = 1;");
    }

    #[test]
    fn no_indent2_suppresses_nesting_indentation() {
        let mut msg = ProtoMessage::new("Flat");
        msg.push_field(ProtoField::new("a", "int32"));
        let o = RenderOptions { no_indent2: true, ..opts() };
        let lines = render_message(&msg, &o);
        assert_eq!(lines[1], "int32 a = 1;");
    }

    #[test]
    fn full_module_has_package_and_trailing_validate_import() {
        let mut m = ProtoModule::new("MyModule", "schemas/my-module.asn1");
        m.push_message(ProtoMessage::new("Age"));
        let text = render(&m, &opts());
        assert!(text.contains("package my_module_asn1.v1;"));
        assert!(text.contains("import \"validate/v1/validate.proto\";"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn import_line_renders_path_and_oid_comment() {
        let import = ProtoImport::new("OtherModule").with_oid(vec![1, 2, 3]);
        assert_eq!(import_line(&import), "import \"other_module/v1/othermodule.proto\"; // { 1 2 3 }");
    }

    #[test]
    fn import_line_without_oid_has_no_trailing_comment() {
        let import = ProtoImport::new("other-module");
        assert_eq!(import_line(&import), "import \"other_module/v1/other-module.proto\";");
    }

    #[test]
    fn module_header_includes_pushed_imports() {
        let mut m = ProtoModule::new("Mod", "mod.asn1");
        m.push_import(ProtoImport::new("dep").with_oid(vec![1, 0]));
        let text = render(&m, &opts());
        assert!(text.contains("import \"dep/v1/dep.proto\"; // { 1 0 }"));
    }

    #[test]
    fn package_gets_pkg_prefix_when_source_does_not_start_lowercase() {
        let m = ProtoModule::new("Mod", "9weird.asn1");
        let text = render(&m, &opts());
        assert!(text.contains("package pkg9weird_asn1.v1;"));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let mut m = ProtoModule::new("Mod", "mod.asn1");
        m.push_message(ProtoMessage::new("A"));
        assert_eq!(render(&m, &opts()), render(&m, &opts()));
    }

    #[test]
    fn andfree_render_matches_borrowing_render() {
        let mut m = ProtoModule::new("Mod", "mod.asn1");
        m.push_message(ProtoMessage::new("A"));
        let borrowed = render(&m, &opts());
        let consumed = render_andfree(m, &opts());
        assert_eq!(borrowed, consumed);
    }

    #[test]
    fn full_module_renders_exact_text() {
        let mut m = ProtoModule::new("Age", "age.asn1");
        let mut msg = ProtoMessage::new("Age");
        msg.push_field(ProtoField::new("value", "int32").with_rules("int32 = {gte: 0, lte: 150}"));
        m.push_message(msg);

        let expected = indoc! {r#"
            ////////////////////// age.proto //////////////////////
            // Protobuf generated from /age.asn1 by asn2proto-1.0
            // Age

            syntax = "proto3";

            package age_asn1.v1;

            import "validate/v1/validate.proto";

            message Age {
                int32 value = 1 [(validate.v1.rules).int32 = {gte: 0, lte: 150}];
            };
        "#};
        assert_eq!(render(&m, &opts()), expected);
    }

    #[test]
    fn params_surface_as_message_comments() {
        let mut msg = ProtoMessage::new("Bounded");
        msg.comments.push("Param :T".to_string());
        msg.params.push(ProtoParam { name: "T".into(), kind: asn2proto_core::ir::ParamKind::Type });
        let lines = render_message(&msg, &opts());
        assert_eq!(lines[0], "// Param :T");
    }
}
