//! Integration tests over real capture directories
//!
//! Tests the full end-to-end flow: capture files → routing → inference → C# files

use clap::Parser;
use jb_schema_gen::cli::{Cli, Runner};
use jb_schema_gen::engine::Generator;
use jb_schema_gen::extract::load_capture_dir;
use jb_schema_gen::schema::{Diagnostic, TypeDescriptor};
use jb_schema_gen::{Category, Error, GeneratorConfig};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const BLOBCAST_CAPTURE: &str = r#"[loader] load success
recv <- {"opcode":"client/welcome","result":{"id":1}}
recv <- {"opcode":"object","result":{"key":"bc:customer:7f3a","val":{"playerName":"ann","state":"","choices":[{"id":1,"text":"yes"}]}}}
recv <- {"opcode":"object","result":{"key":"bc:customer:7f3a","val":{"playerName":null,"state":"Draw","choices":[]}}}
send -> {"opcode":"client/send","params":{"body":{"action":"choose","choice":1}}}
"#;

const ROOM_CAPTURE: &str = r#"recv <- {"opcode":"object","result":{"key":"bc:room","val":{"round":1,"scores":{"ann":3}}}}
recv <- {"opcode":"object","result":{"key":"bc:room","val":{"round":2,"scores":null}}}
recv <- {"opcode":"object","result":{"key":"textDescriptions","val":{"latest":[]}}}
"#;

const EXPECTED_PLAYER: &str = r#"// This file was generated with jb-schema-gen

#nullable enable
using System.Collections.Generic;
using Newtonsoft.Json;
using Newtonsoft.Json.Linq;

namespace JackboxGPT.Games.Quiz.Models;

[JsonConverter(typeof(Newtonsoft.Json.Converters.StringEnumConverter))]
public enum State
{
    [System.Runtime.Serialization.EnumMember(Value = "")]
    None,
    Draw
}

public struct QuizPlayer
{
    [JsonProperty("choices")]
    public List<PlayerChoices> Choices { get; set; }

    [JsonProperty("playerName")]
    public string? PlayerName { get; set; }

    [JsonProperty("state")]
    public State State { get; set; }
}

public struct PlayerChoices
{
    [JsonProperty("id")]
    public int Id { get; set; }

    [JsonProperty("text")]
    public string Text { get; set; }
}
"#;

fn capture_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("01-player.txt"), BLOBCAST_CAPTURE).unwrap();
    fs::write(dir.path().join("02-room.json"), ROOM_CAPTURE).unwrap();
    fs::write(dir.path().join("notes.md"), r#"{"opcode":"object"}"#).unwrap();
    dir
}

fn project_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/Engines")).unwrap();
    dir
}

fn run(args: &[&str]) -> jb_schema_gen::Result<()> {
    let cli = Cli::try_parse_from(args).unwrap();
    Runner::new(cli).run()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[test]
fn test_analyze_capture_directory() {
    let captures = capture_dir();
    let text = load_capture_dir(captures.path()).unwrap();

    let generator = Generator::new(GeneratorConfig {
        enum_names: vec!["state".to_string()],
        ..Default::default()
    });
    let analysis = generator.analyze(&text, "Quiz");

    assert_eq!(analysis.report.folded_into(Category::Player), 2);
    assert_eq!(analysis.report.folded_into(Category::Room), 2);
    assert_eq!(analysis.report.ignored, 2);
    assert_eq!(analysis.report.sent, 1);

    let room = analysis.schema.category(Category::Room).unwrap();
    let scores = room.root.field("scores").unwrap();
    assert_eq!(scores.ty, TypeDescriptor::Struct("RoomScores".to_string()));
    assert!(scores.nullable);
    assert!(room.follow_up("RoomScores").is_some());
    assert!(room.enums.is_empty());

    let player = analysis.schema.category(Category::Player).unwrap();
    assert_eq!(player.enums.len(), 1);
    assert!(player.enums[0].has_blank);
}

#[test]
fn test_unresolvable_shapes_degrade_to_raw() {
    let capture = r#"
{"opcode":"object","result":{"key":"room","val":{"grid":[[1]],"mixed":[1],"gone":null,"any":"x"}}}
{"opcode":"object","result":{"key":"room","val":{"mixed":["a"],"any":5}}}
"#;
    let analysis = Generator::default().analyze(capture, "Quiz");
    let room = &analysis.schema.category(Category::Room).unwrap().root;

    for (name, diagnostic) in [
        ("grid", Diagnostic::ListOfLists),
        ("mixed", Diagnostic::MixedListElements),
        ("gone", Diagnostic::AlwaysNull),
    ] {
        let field = room.field(name).unwrap();
        assert_eq!(field.ty, TypeDescriptor::Raw, "{name}");
        assert_eq!(field.diagnostic.as_ref(), Some(&diagnostic), "{name}");
        assert!(!field.nullable, "{name}");
    }
    assert_eq!(
        room.field("any").unwrap().diagnostic.as_ref().unwrap().to_string(),
        "Can be multiple types: string or int"
    );
}

// ============================================================================
// CLI Tests
// ============================================================================

#[test]
fn test_generate_writes_models_and_scaffolding() {
    let captures = capture_dir();
    let project = project_dir();

    run(&[
        "jb-schema-gen",
        "generate",
        "Quiz",
        path_arg(captures.path()),
        "state",
        "--project",
        path_arg(project.path()),
    ])
    .unwrap();

    let models = project.path().join("src/Games/Quiz/Models");
    assert_eq!(
        fs::read_to_string(models.join("QuizPlayer.cs")).unwrap(),
        EXPECTED_PLAYER
    );

    let room = fs::read_to_string(models.join("QuizRoom.cs")).unwrap();
    assert!(room.contains("public RoomScores? Scores { get; set; }"));
    assert!(room.contains("public struct RoomScores"));

    let client = fs::read_to_string(project.path().join("src/Games/Quiz/QuizClient.cs")).unwrap();
    assert!(client.contains("BcSerializedClient<QuizRoom, QuizPlayer>"));
    assert!(project.path().join("src/Engines/QuizEngine.cs").exists());
}

#[test]
fn test_generate_keeps_existing_scaffolding() {
    let captures = capture_dir();
    let project = project_dir();
    let engine = project.path().join("src/Engines/QuizEngine.cs");
    fs::write(&engine, "// customised").unwrap();

    let args = [
        "jb-schema-gen",
        "generate",
        "Quiz",
        path_arg(captures.path()),
        "--project",
        path_arg(project.path()),
    ];
    run(&args).unwrap();
    run(&args).unwrap();

    assert_eq!(fs::read_to_string(&engine).unwrap(), "// customised");
}

#[test]
fn test_generate_requires_project_layout() {
    let captures = capture_dir();
    let project = tempdir().unwrap();

    let err = run(&[
        "jb-schema-gen",
        "generate",
        "Quiz",
        path_arg(captures.path()),
        "--project",
        path_arg(project.path()),
    ])
    .unwrap_err();

    assert!(matches!(err, Error::Layout { .. }));
    assert!(err.is_usage_error());
    assert!(!project.path().join("src").exists());
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let captures = capture_dir();
    let project = tempdir().unwrap();

    run(&[
        "jb-schema-gen",
        "generate",
        "Quiz",
        path_arg(captures.path()),
        "--project",
        path_arg(project.path()),
        "--dry-run",
    ])
    .unwrap();

    assert!(!project.path().join("src").exists());
}

#[test]
fn test_generate_with_config_file() {
    let captures = capture_dir();
    let project = project_dir();
    let config = project.path().join("jb-schema-gen.yaml");
    fs::write(
        &config,
        format!(
            "namespace_root: Bots\nproject_dir: {}\nscaffold: false\n",
            path_arg(project.path())
        ),
    )
    .unwrap();

    run(&[
        "jb-schema-gen",
        "-C",
        path_arg(&config),
        "generate",
        "Quiz",
        path_arg(captures.path()),
    ])
    .unwrap();

    let room =
        fs::read_to_string(project.path().join("src/Games/Quiz/Models/QuizRoom.cs")).unwrap();
    assert!(room.contains("namespace Bots.Games.Quiz.Models;"));
    assert!(!project.path().join("src/Engines/QuizEngine.cs").exists());
}

#[test]
fn test_generate_rejects_invalid_game_name() {
    let captures = capture_dir();
    let err = run(&[
        "jb-schema-gen",
        "generate",
        "Quiz Time",
        path_arg(captures.path()),
        "--dry-run",
    ])
    .unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

#[test]
fn test_inspect_missing_input() {
    let dir = tempdir().unwrap();
    let err = run(&[
        "jb-schema-gen",
        "inspect",
        path_arg(&dir.path().join("missing")),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));
}

#[test]
fn test_inspect_json() {
    let captures = capture_dir();
    run(&[
        "jb-schema-gen",
        "inspect",
        path_arg(captures.path()),
        "state",
        "--format",
        "json",
    ])
    .unwrap();
}
