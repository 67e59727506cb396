//! Client and engine templates for a newly modelled game

use super::RenderedFile;
use crate::config::GeneratorConfig;
use crate::protocol::Dialect;

/// Client class wiring the generated room and player models
///
/// Without a detected dialect the newer client base class is used.
pub fn client_template(game_name: &str, dialect: Option<Dialect>, namespace_root: &str) -> String {
    let base_class = dialect.unwrap_or(Dialect::Ecast).client_base_class();
    format!(
        r"using {namespace_root}.Games.Common;
using {namespace_root}.Games.{game_name}.Models;
using {namespace_root}.Services;
using Serilog;

namespace {namespace_root}.Games.{game_name};

public class {game_name}Client : {base_class}<{game_name}Room, {game_name}Player>
{{
    public {game_name}Client(IConfigurationProvider configuration, ILogger logger, int instance)
        : base(configuration, logger, instance)
    {{
    }}
}}
"
    )
}

/// Engine class subscribed to room and player updates
pub fn engine_template(game_name: &str, namespace_root: &str) -> String {
    format!(
        r#"using {namespace_root}.Games.Common.Models;
using {namespace_root}.Games.{game_name};
using {namespace_root}.Games.{game_name}.Models;
using {namespace_root}.Services;
using Serilog;

namespace {namespace_root}.Engines;

public class {game_name}Engine : BaseJackboxEngine<{game_name}Client>
{{
    protected override string Tag => "{game_name}";

    public {game_name}Engine(ICompletionService completionService, ILogger logger, {game_name}Client client, int instance)
        : base(completionService, logger, client, instance)
    {{
        JackboxClient.OnSelfUpdate += OnSelfUpdate;
        JackboxClient.OnRoomUpdate += OnRoomUpdate;
        JackboxClient.Connect();
    }}

    private void OnSelfUpdate(object sender, Revision<{game_name}Player> revision)
    {{
    }}

    private void OnRoomUpdate(object sender, Revision<{game_name}Room> revision)
    {{
    }}
}}
"#
    )
}

/// Template files with their destination paths inside the project
pub fn scaffold_files(
    game_name: &str,
    dialect: Option<Dialect>,
    config: &GeneratorConfig,
) -> Vec<RenderedFile> {
    let src = config.src_dir();
    vec![
        RenderedFile::new(
            src.join("Games")
                .join(game_name)
                .join(format!("{game_name}Client.cs")),
            client_template(game_name, dialect, &config.namespace_root),
        ),
        RenderedFile::new(
            config.engines_dir().join(format!("{game_name}Engine.cs")),
            engine_template(game_name, &config.namespace_root),
        ),
    ]
}
