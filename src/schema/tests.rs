//! Schema inference tests

use super::*;
use crate::types::{Category, JsonObject, JsonValue};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;
use test_case::test_case;

fn object(value: JsonValue) -> JsonObject {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn observe_all(name: &str, values: &[JsonValue]) -> FieldModel {
    let mut model = FieldModel::new(name);
    for value in values {
        model.observe(value);
    }
    model
}

fn resolve_field(model: &mut FieldModel) -> ResolvedField {
    model.resolve(&BTreeSet::new(), "Room").field
}

fn fold_room(records: &[JsonValue]) -> SchemaAccumulator {
    let mut acc = SchemaAccumulator::new();
    for record in records {
        acc.fold(Category::Room, &object(record.clone()));
    }
    acc
}

fn room(schema: &ResolvedSchema) -> &CategorySchema {
    schema.category(Category::Room).unwrap()
}

// ============================================================================
// Kind Tests
// ============================================================================

#[test_case(json!("x"), Kind::String; "string")]
#[test_case(json!(3), Kind::Integer; "integer")]
#[test_case(json!(-3), Kind::Integer; "negative integer")]
#[test_case(json!(3.5), Kind::Float; "float")]
#[test_case(json!(true), Kind::Boolean; "boolean")]
#[test_case(json!([]), Kind::List; "list")]
#[test_case(json!({}), Kind::Object; "object")]
#[test_case(json!(null), Kind::Null; "null")]
fn test_kind_of(value: JsonValue, expected: Kind) {
    assert_eq!(Kind::of(&value), expected);
}

// ============================================================================
// Observe Tests
// ============================================================================

#[test]
fn test_observe_null_only_marks_nullable() {
    let model = observe_all("hp", &[json!(null)]);
    assert!(model.is_nullable());
    assert!(model.kinds().is_empty());
    assert!(model.children().is_empty());
}

#[test]
fn test_observe_list_samples_first_element_only() {
    let model = observe_all("items", &[json!([1, "two", [3]])]);
    let entry = model.entry().unwrap();
    assert_eq!(entry.name(), LIST_ENTRY);
    assert_eq!(entry.kinds().iter().copied().collect::<Vec<_>>(), vec![Kind::Integer]);
}

#[test]
fn test_observe_empty_containers_add_kind_without_children() {
    let list = observe_all("items", &[json!([])]);
    assert_eq!(list.kinds().len(), 1);
    assert!(list.entry().is_none());

    let obj = observe_all("meta", &[json!({})]);
    assert!(obj.kinds().contains(&Kind::Object));
    assert!(obj.children().is_empty());
}

#[test]
fn test_observe_object_merges_children() {
    let model = observe_all(
        "stats",
        &[json!({"hp": 1}), json!({"mp": 2, "hp": null})],
    );
    assert_eq!(model.children().len(), 2);
    assert!(model.child("hp").unwrap().is_nullable());
    assert!(!model.child("mp").unwrap().is_nullable());
}

#[test]
fn test_contains_field_searches_nested() {
    let model = observe_all("outer", &[json!({"inner": [{"color": "red"}]})]);
    assert!(model.contains_field("inner"));
    assert!(model.contains_field("color"));
    assert!(!model.contains_field("outer"));
}

// ============================================================================
// Widening Tests
// ============================================================================

#[test]
fn test_widening_int_float_int_resolves_float() {
    let mut model = observe_all("speed", &[json!(1), json!(1.5), json!(2)]);
    let field = resolve_field(&mut model);
    assert_eq!(field.ty, TypeDescriptor::Primitive(Primitive::Float));
    assert_eq!(field.diagnostic, None);
}

#[test]
fn test_integer_only_stays_integer() {
    let mut model = observe_all("count", &[json!(1), json!(2)]);
    assert_eq!(
        resolve_field(&mut model).ty,
        TypeDescriptor::Primitive(Primitive::Integer)
    );
}

#[test]
fn test_widening_is_permanent() {
    let mut model = observe_all("speed", &[json!(1), json!(1.5)]);
    resolve_field(&mut model);
    assert_eq!(model.kinds().iter().copied().collect::<Vec<_>>(), vec![Kind::Float]);
    assert!(!model.widen_numeric());
}

#[test]
fn test_widening_does_not_apply_with_third_kind() {
    let mut model = observe_all("v", &[json!(1), json!(1.5), json!("x")]);
    let field = resolve_field(&mut model);
    assert!(field.ty.is_raw());
    assert_eq!(
        field.diagnostic,
        Some(Diagnostic::MultipleKinds {
            kinds: vec![Kind::String, Kind::Integer, Kind::Float],
            nullable: false,
        })
    );
}

// ============================================================================
// Nullability Tests
// ============================================================================

#[test]
fn test_nullable_string() {
    let mut model = observe_all("name", &[json!(null), json!("x"), json!(null)]);
    let field = resolve_field(&mut model);
    assert_eq!(field.ty, TypeDescriptor::Primitive(Primitive::String));
    assert!(field.nullable);
    assert_eq!(field.diagnostic, None);
}

#[test]
fn test_always_null_is_raw_and_not_nullable() {
    let mut model = observe_all("ghost", &[json!(null), json!(null)]);
    let field = resolve_field(&mut model);
    assert_eq!(field.ty, TypeDescriptor::Raw);
    assert!(!field.nullable);
    assert_eq!(field.diagnostic, Some(Diagnostic::AlwaysNull));
}

#[test]
fn test_end_to_end_hp_is_nullable_float() {
    let acc = &mut fold_room(&[json!({"hp": 5}), json!({"hp": 5.5}), json!({"hp": null})]);
    let schema = acc.resolve_all("Game");
    let hp = room(&schema).root.field("hp").unwrap();

    assert_eq!(hp.ty, TypeDescriptor::Primitive(Primitive::Float));
    assert!(hp.nullable);
    assert_eq!(hp.diagnostic, None);
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_list_of_primitives() {
    let mut model = observe_all("scores", &[json!([1, 2]), json!([]), json!([3])]);
    let field = resolve_field(&mut model);
    assert_eq!(
        field.ty,
        TypeDescriptor::List(Box::new(TypeDescriptor::Primitive(Primitive::Integer)))
    );
}

#[test_case(&[json!([])], Diagnostic::AlwaysEmpty; "always empty list")]
#[test_case(&[json!([null])], Diagnostic::AlwaysEmpty; "list of nulls")]
#[test_case(&[json!({})], Diagnostic::AlwaysEmpty; "always empty object")]
#[test_case(&[json!([{}])], Diagnostic::AlwaysEmpty; "list of empty objects")]
#[test_case(&[json!([1]), json!(["x"])], Diagnostic::MixedListElements; "mixed elements")]
#[test_case(&[json!([[1]])], Diagnostic::ListOfLists; "list of lists")]
fn test_unrepresentable_lists_are_raw(values: &[JsonValue], expected: Diagnostic) {
    let mut model = observe_all("things", values);
    let field = resolve_field(&mut model);
    assert_eq!(field.ty, TypeDescriptor::Raw);
    assert_eq!(field.diagnostic, Some(expected));
}

#[test]
fn test_list_of_objects_synthesizes_struct() {
    let acc = &mut fold_room(&[json!({"items": [{"a": 1}]}), json!({"items": [{"a": 2}]})]);
    let schema = acc.resolve_all("Game");
    let room = room(&schema);

    let items = room.root.field("items").unwrap();
    assert_eq!(
        items.ty,
        TypeDescriptor::List(Box::new(TypeDescriptor::Struct("RoomItems".to_string())))
    );

    let synthesized = room.follow_up("RoomItems").unwrap();
    assert_eq!(synthesized.fields.len(), 1);
    assert_eq!(synthesized.fields[0].name, "a");
    assert_eq!(
        synthesized.fields[0].ty,
        TypeDescriptor::Primitive(Primitive::Integer)
    );
}

#[test]
fn test_nullable_list_keeps_element_type() {
    let mut model = observe_all("tags", &[json!(["a"]), json!(null)]);
    let field = resolve_field(&mut model);
    assert_eq!(
        field.ty,
        TypeDescriptor::List(Box::new(TypeDescriptor::Primitive(Primitive::String)))
    );
    assert!(field.nullable);
}

// ============================================================================
// Object Tests
// ============================================================================

#[test]
fn test_object_synthesizes_prefixed_struct() {
    let mut model = observe_all("stats", &[json!({"hp": 1})]);
    let resolution = model.resolve(&BTreeSet::new(), "Player");

    assert_eq!(
        resolution.field.ty,
        TypeDescriptor::Struct("PlayerStats".to_string())
    );
    let follow_up = resolution.follow_up.unwrap();
    assert_eq!(follow_up.type_name, "PlayerStats");
    assert!(follow_up.fields.contains_key("hp"));
}

#[test]
fn test_follow_ups_are_depth_first() {
    let acc = &mut fold_room(&[json!({
        "a": {"b": {"c": 1}},
        "z": {"w": true}
    })]);
    let schema = acc.resolve_all("Game");
    let names: Vec<_> = room(&schema)
        .follow_ups
        .iter()
        .map(|s| s.name.as_str())
        .collect();

    assert_eq!(names, vec!["RoomA", "RoomAB", "RoomZ"]);
}

#[test]
fn test_colliding_synthesized_names_are_suffixed() {
    let acc = &mut fold_room(&[json!({
        "a": {"b": {"y": 1}},
        "aB": {"x": 1}
    })]);
    let schema = acc.resolve_all("Game");
    let room = room(&schema);

    assert_eq!(
        room.root.field("aB").unwrap().ty,
        TypeDescriptor::Struct("RoomAB".to_string())
    );
    let nested = room.follow_up("RoomA").unwrap();
    assert_eq!(
        nested.field("b").unwrap().ty,
        TypeDescriptor::Struct("RoomAB2".to_string())
    );
    assert!(room.follow_up("RoomAB2").unwrap().field("y").is_some());
}

#[test]
fn test_multiple_kinds_diagnostic_text() {
    let mut model = observe_all("v", &[json!("x"), json!(1), json!([1]), json!(null)]);
    let field = resolve_field(&mut model);
    assert!(!field.nullable);
    assert_eq!(
        field.diagnostic.unwrap().to_string(),
        "Can be multiple types: string or int or List (or null)"
    );
}

// ============================================================================
// Enum Tests
// ============================================================================

#[test]
fn test_enum_extraction_with_blank() {
    let mut acc = SchemaAccumulator::with_enum_names(["color"]);
    for record in [json!({"color": "red"}), json!({"color": "blue"}), json!({"color": ""})] {
        acc.track_enums(&record);
        acc.fold(Category::Room, &object(record));
    }
    let schema = acc.resolve_all("Game");
    let room = room(&schema);

    assert_eq!(
        room.root.field("color").unwrap().ty,
        TypeDescriptor::Enum("Color".to_string())
    );
    assert_eq!(
        room.enums,
        vec![EnumDefinition {
            name: "Color".to_string(),
            field_name: "color".to_string(),
            values: vec!["blue".to_string(), "red".to_string()],
            has_blank: true,
        }]
    );
}

#[test]
fn test_enum_name_takes_precedence_over_kinds() {
    let mut model = observe_all("state", &[json!("a"), json!(3)]);
    let enums: BTreeSet<String> = ["state".to_string()].into();
    let field = model.resolve(&enums, "Room").field;
    assert_eq!(field.ty, TypeDescriptor::Enum("State".to_string()));
    assert_eq!(field.diagnostic, None);
}

#[test]
fn test_track_enums_finds_nested_fields() {
    let mut acc = SchemaAccumulator::with_enum_names(["kind"]);
    acc.track_enums(&json!({"a": {"kind": "x"}, "list": [{"kind": "y"}], "kind": 3}));
    let values: Vec<_> = acc.enum_registry()["kind"].iter().cloned().collect();
    assert_eq!(values, vec!["x".to_string(), "y".to_string()]);
}

#[test]
fn test_follow_up_fields_do_not_resolve_as_enums() {
    let mut acc = SchemaAccumulator::with_enum_names(["kind"]);
    let record = json!({"card": {"kind": "spade"}});
    acc.track_enums(&record);
    acc.fold(Category::Player, &object(record));
    let schema = acc.resolve_all("Game");
    let player = schema.category(Category::Player).unwrap();

    let card = player.follow_up("PlayerCard").unwrap();
    assert_eq!(
        card.field("kind").unwrap().ty,
        TypeDescriptor::Primitive(Primitive::String)
    );
    // Still claimed, since the tree contains the field
    assert_eq!(player.enums.len(), 1);
}

#[test]
fn test_enum_claimed_by_first_category_only() {
    let mut acc = SchemaAccumulator::with_enum_names(["phase", "unused"]);
    let room_record = json!({"phase": "lobby"});
    let player_record = json!({"phase": "voting"});
    acc.track_enums(&room_record);
    acc.track_enums(&player_record);
    acc.track_enums(&json!({"unused": "value"}));
    acc.fold(Category::Room, &object(room_record));
    acc.fold(Category::Player, &object(player_record));

    let schema = acc.resolve_all("Game");
    let player = schema.category(Category::Player).unwrap();

    assert_eq!(player.enums.len(), 1);
    assert_eq!(player.enums[0].values, vec!["lobby", "voting"]);
    assert!(room(&schema).enums.is_empty());
    assert_eq!(
        room(&schema).root.field("phase").unwrap().ty,
        TypeDescriptor::Enum("Phase".to_string())
    );
    assert_eq!(schema.unclaimed_enums, vec!["unused".to_string()]);
}

/// Every `Enum(name)` a field refers to is declared by some category
fn assert_enum_references_declared(schema: &ResolvedSchema) {
    let declared: BTreeSet<&str> = schema
        .categories
        .iter()
        .flat_map(|c| c.enums.iter().map(|e| e.name.as_str()))
        .collect();
    for category in &schema.categories {
        for declaration in std::iter::once(&category.root).chain(&category.follow_ups) {
            for field in &declaration.fields {
                if let TypeDescriptor::Enum(name) = &field.ty {
                    assert!(
                        declared.contains(name.as_str()),
                        "{}.{} refers to undeclared enum {name}",
                        declaration.name,
                        field.name
                    );
                }
            }
        }
    }
}

#[test_case(json!({"color": null}); "only null")]
#[test_case(json!({"color": 3}); "only numeric")]
fn test_enum_without_values_is_declared_empty(record: JsonValue) {
    let mut acc = SchemaAccumulator::with_enum_names(["color"]);
    acc.track_enums(&record);
    acc.fold(Category::Room, &object(record));
    let schema = acc.resolve_all("Game");

    assert_eq!(
        room(&schema).root.field("color").unwrap().ty,
        TypeDescriptor::Enum("Color".to_string())
    );
    assert_eq!(room(&schema).enums.len(), 1);
    assert!(room(&schema).enums[0].values.is_empty());
    assert!(!room(&schema).enums[0].has_blank);
    assert!(schema.unclaimed_enums.is_empty());
    assert_enum_references_declared(&schema);
}

#[test]
fn test_enum_used_by_both_categories_is_declared_once() {
    let mut acc = SchemaAccumulator::with_enum_names(["phase"]);
    acc.fold(Category::Player, &object(json!({"phase": null})));
    acc.fold(Category::Room, &object(json!({"phase": 1})));
    let schema = acc.resolve_all("Game");

    let player = schema.category(Category::Player).unwrap();
    assert_eq!(player.enums.len(), 1);
    assert!(room(&schema).enums.is_empty());
    assert_enum_references_declared(&schema);
}

// ============================================================================
// Accumulator Tests
// ============================================================================

#[test]
fn test_resolve_all_names_roots_and_orders_categories() {
    let mut acc = SchemaAccumulator::new();
    let schema = acc.resolve_all("Quiplash");

    let names: Vec<_> = schema.categories.iter().map(|c| c.root.name.as_str()).collect();
    assert_eq!(names, vec!["QuiplashPlayer", "QuiplashRoom"]);
    assert!(schema.is_empty());
}

#[test]
fn test_fields_are_sorted_by_name() {
    let acc = &mut fold_room(&[json!({"zeta": 1, "alpha": 2}), json!({"mid": 3})]);
    let schema = acc.resolve_all("Game");
    let names: Vec<_> = room(&schema)
        .root
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_resolved_schema_serializes() {
    let acc = &mut fold_room(&[json!({"hp": 1, "items": [{"a": true}]})]);
    let schema = acc.resolve_all("Game");
    let value: JsonValue = serde_json::from_str(&schema.to_json_pretty()).unwrap();

    let fields = &value["categories"][1]["root"]["fields"];
    assert_eq!(fields[0]["name"], "hp");
    assert_eq!(fields[0]["type"]["kind"], "primitive");
    assert_eq!(fields[1]["type"]["kind"], "list");
}

// ============================================================================
// Fingerprint Tests
// ============================================================================

fn key_fields() -> Vec<String> {
    vec!["action".to_string(), "key".to_string()]
}

#[test]
fn test_fingerprint_masks_prefixed_keys() {
    let message = object(json!({"action": "vote:42", "key": "submit", "choice": 3}));
    let fingerprint = Fingerprint::of(&message, &key_fields());
    let lines: Vec<_> = fingerprint.lines().collect();

    assert_eq!(
        lines,
        vec![
            "\"action\": \"vote:<ID>\"",
            "\"choice\": <integer>",
            "\"key\": \"submit\"",
        ]
    );
}

#[test]
fn test_fingerprint_renders_nested_objects() {
    let message = object(json!({"body": {"text": "hi", "action": "a:b:c"}}));
    let fingerprint = Fingerprint::of(&message, &key_fields());

    assert_eq!(
        fingerprint.to_string(),
        "Sent = {\n  \"body\": {\n    \"action\": \"a:<ID>\"\n    \"text\": <string>\n  }\n}"
    );
}

#[test]
fn test_fingerprint_non_string_key_field_keeps_kind() {
    let message = object(json!({"key": 7}));
    let fingerprint = Fingerprint::of(&message, &key_fields());
    assert_eq!(fingerprint.lines().collect::<Vec<_>>(), vec!["\"key\": <integer>"]);
}

#[test]
fn test_sent_shapes_deduplicate_by_shape() {
    let mut acc = SchemaAccumulator::new();
    acc.record_sent(&object(json!({"action": "vote:1", "n": 1})), &key_fields());
    acc.record_sent(&object(json!({"n": 99, "action": "vote:2"})), &key_fields());
    acc.record_sent(&object(json!({"action": "vote:3", "n": "x"})), &key_fields());

    assert_eq!(acc.sent_shapes().len(), 2);
}

// ============================================================================
// Order Independence
// ============================================================================

fn mixed_samples() -> Vec<JsonValue> {
    vec![
        json!({"hp": 5, "name": "a", "items": [{"id": 1}], "state": "lobby"}),
        json!({"hp": 5.5, "name": null, "items": [], "state": "voting"}),
        json!({"hp": null, "tags": [1], "meta": {"round": 1}}),
        json!({"tags": ["x"], "meta": {"round": 2.5, "extra": null}}),
        json!({"state": "", "flag": true, "flag2": "maybe"}),
        json!({"flag2": false, "items": [{"id": 2, "label": "x"}]}),
    ]
}

fn resolve_samples(samples: &[JsonValue]) -> ResolvedSchema {
    let mut acc = SchemaAccumulator::with_enum_names(["state"]);
    for sample in samples {
        acc.track_enums(sample);
        acc.fold(Category::Room, &object(sample.clone()));
    }
    acc.resolve_all("Game")
}

const SAMPLE_FIELDS: &[&str] = &["hp", "items", "meta", "name", "state"];

fn sample_value() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        (-1000i64..1000).prop_map(JsonValue::from),
        (-1000.0f64..1000.0).prop_map(JsonValue::from),
        any::<bool>().prop_map(JsonValue::from),
        prop::sample::select(vec!["", "lobby", "voting"]).prop_map(JsonValue::from),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(JsonValue::Array),
            sample_object(inner).prop_map(JsonValue::Object),
        ]
    })
}

fn sample_object(values: impl Strategy<Value = JsonValue>) -> impl Strategy<Value = JsonObject> {
    prop::collection::btree_map(prop::sample::select(SAMPLE_FIELDS.to_vec()), values, 0..5)
        .prop_map(|fields| {
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect()
        })
}

/// A generated batch of records plus a permutation of it
fn shuffled_records() -> impl Strategy<Value = (Vec<JsonValue>, Vec<JsonValue>)> {
    prop::collection::vec(sample_object(sample_value()).prop_map(JsonValue::Object), 1..8)
        .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
}

proptest! {
    #[test]
    fn prop_resolution_is_order_independent(order in Just(mixed_samples()).prop_shuffle()) {
        prop_assert_eq!(resolve_samples(&order), resolve_samples(&mixed_samples()));
    }

    #[test]
    fn prop_generated_records_resolve_order_independently(
        (records, shuffled) in shuffled_records()
    ) {
        let schema = resolve_samples(&records);
        assert_enum_references_declared(&schema);
        prop_assert_eq!(resolve_samples(&shuffled), schema);
    }
}
