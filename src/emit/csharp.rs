//! C# source rendering

use super::naming::{enum_members, property_names};
use crate::schema::{CategorySchema, EnumDefinition, Primitive, ResolvedStruct, TypeDescriptor};

/// First line of every generated model file
pub const GENERATED_BANNER: &str = "// This file was generated with jb-schema-gen";

const INDENT: &str = "    ";

/// C# spelling of a resolved type, without nullability
pub fn cs_type(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::Primitive(primitive) => match primitive {
            Primitive::String => "string",
            Primitive::Integer => "int",
            Primitive::Float => "double",
            Primitive::Boolean => "bool",
        }
        .to_string(),
        TypeDescriptor::Enum(name) | TypeDescriptor::Struct(name) => name.clone(),
        TypeDescriptor::List(inner) => format!("List<{}>", cs_type(inner)),
        TypeDescriptor::Raw => "JRaw".to_string(),
    }
}

/// Render one category's model file
///
/// Layout: banner, usings, namespace, claimed enums, root struct, then the
/// follow-up structs in resolution order.
pub fn render_model_file(game_name: &str, schema: &CategorySchema, namespace_root: &str) -> String {
    let namespace = format!("{namespace_root}.Games.{game_name}.Models");

    if schema.root.is_empty() {
        return format!(
            "{GENERATED_BANNER}\n\nnamespace {namespace};\n\npublic struct {}\n{{\n}}\n",
            schema.root.name
        );
    }

    let mut out = format!(
        "{GENERATED_BANNER}\n\n\
         #nullable enable\n\
         using System.Collections.Generic;\n\
         using Newtonsoft.Json;\n\
         using Newtonsoft.Json.Linq;\n\n\
         namespace {namespace};\n"
    );
    for definition in &schema.enums {
        out.push_str(&render_enum(definition));
    }
    out.push_str(&render_struct(&schema.root));
    for follow_up in &schema.follow_ups {
        out.push_str(&render_struct(follow_up));
    }
    out
}

/// Render an enum declaration
pub fn render_enum(definition: &EnumDefinition) -> String {
    let (default, members) = enum_members(definition);
    let mut out = String::new();

    if definition.has_blank || members.iter().any(|m| m.alias.is_some()) {
        out.push_str(
            "\n[JsonConverter(typeof(Newtonsoft.Json.Converters.StringEnumConverter))]",
        );
    }
    out.push_str(&format!("\npublic enum {}\n{{\n", definition.name));

    if definition.has_blank {
        out.push_str(&format!(
            "{INDENT}[System.Runtime.Serialization.EnumMember(Value = \"\")]\n"
        ));
    }
    out.push_str(INDENT);
    out.push_str(&default);

    for member in &members {
        out.push_str(",\n");
        out.push_str(INDENT);
        if let Some(alias) = &member.alias {
            out.push_str(&format!(
                "[System.Runtime.Serialization.EnumMember(Value = \"{}\")]\n{INDENT}",
                escape(alias)
            ));
        }
        out.push_str(&member.name);
    }
    out.push_str("\n}\n");
    out
}

/// Render a struct declaration with one property per field
pub fn render_struct(declaration: &ResolvedStruct) -> String {
    let names = property_names(declaration.fields.iter().map(|f| f.name.as_str()));
    let mut out = format!("\npublic struct {}\n{{", declaration.name);
    for (field, property) in declaration.fields.iter().zip(names) {
        let mut type_name = cs_type(&field.ty);
        if field.nullable {
            type_name.push('?');
        }
        out.push_str(&format!(
            "\n{INDENT}[JsonProperty(\"{}\")]\n{INDENT}public {type_name} {property} {{ get; set; }}",
            escape(&field.name)
        ));
        if let Some(diagnostic) = &field.diagnostic {
            out.push_str(&format!(" // {diagnostic}"));
        }
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

/// Escape a value for a C# string literal
fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
