//! quire - discover, manage and run editor scripts from the command line.
//!
//! Usage:
//!   quire list                     Show the script and hook trees
//!   quire run <SCRIPT>             Run a standalone script
//!   quire hooks <HOOK>             Run every script bound to a hook
//!   quire enable|disable <SCRIPT>  Toggle a script
//!   quire plugins on|off           Allow scripts in plugin languages
//!   quire debugger on|off          Forward interpreter debug output
//!   quire languages                List scripting languages
//!   quire --help                   Show help

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use tracing_subscriber::EnvFilter;

use quire_core::{ScriptingSettings, Value};
use quire_host::{Notifier, ScriptableWindow, about_scripts};
use quire_manager::{ManagerConfig, ScriptManager};
use quire_plugin::{LanguageRegistry, plugin_dir_from_env};

#[derive(Parser)]
#[command(
    name = "quire",
    version,
    about = "Script discovery, hooks and execution for a text editor",
    long_about = "quire finds scripts under a scripts directory, builds menus and hook \
                  lists from their headers, and runs them in Rhai, Lua or plugin languages."
)]
struct Cli {
    /// Scripts directory (defaults to the user data directory)
    #[arg(short, long, global = true)]
    scripts: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory of language plugin manifests
    #[arg(long, global = true)]
    plugins: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the standalone and hook script trees
    List,

    /// Run a standalone script as a menu action
    Run {
        /// Path of the script
        script: PathBuf,

        /// Window type the script runs from
        #[arg(short, long, default_value = "TeXDocument")]
        window: String,

        /// Extra data for the script (KEY=VALUE, VALUE may be JSON)
        #[arg(short, long = "data", value_name = "KEY=VALUE")]
        data: Vec<String>,
    },

    /// Run every script bound to a hook
    Hooks {
        /// Hook name (case-insensitive)
        hook: String,

        /// Window type the hooks run from
        #[arg(short, long, default_value = "TeXDocument")]
        window: String,
    },

    /// Enable a script
    Enable { script: PathBuf },

    /// Disable a script
    Disable { script: PathBuf },

    /// Allow or forbid scripts in plugin languages
    Plugins { state: Toggle },

    /// Turn script debug output on or off
    Debugger { state: Toggle },

    /// List the available scripting languages
    Languages,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

/// Prints script output to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn show_status(&mut self, message: &str, _timeout: Duration) {
        eprintln!("{message}");
    }

    fn show_message(&mut self, title: &str, body: &str) {
        println!("{title}:");
        println!("{body}");
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut manager = open_manager(&cli)?;

    match cli.command {
        Command::List => run_list(&manager),
        Command::Run {
            script,
            window,
            data,
        } => run_script(&manager, &script, &window, &data)?,
        Command::Hooks { hook, window } => run_hooks(&manager, &hook, &window),
        Command::Enable { script } => {
            manager
                .set_script_enabled(&script, true)
                .with_context(|| format!("Failed to enable {}", script.display()))?;
        }
        Command::Disable { script } => {
            manager
                .set_script_enabled(&script, false)
                .with_context(|| format!("Failed to disable {}", script.display()))?;
        }
        Command::Plugins { state } => {
            manager
                .set_plugins_enabled(state.enabled())
                .context("Failed to save settings")?;
            let summary = manager.reload_scripts(false);
            eprintln!("Scripts reloaded: {summary}");
        }
        Command::Debugger { state } => {
            manager
                .set_debugger_enabled(state.enabled())
                .context("Failed to save settings")?;
        }
        Command::Languages => print!("{}", about_scripts(&manager)),
    }

    Ok(())
}

/// Build the language registry and load the script forest.
fn open_manager(cli: &Cli) -> Result<ScriptManager> {
    let scripts_root = match &cli.scripts {
        Some(dir) => dir.clone(),
        None => dirs::data_dir()
            .map(|d| d.join("quire").join("scripts"))
            .ok_or_else(|| eyre!("No data directory; pass --scripts"))?,
    };

    let config = match cli.settings.clone().or_else(ScriptingSettings::default_path) {
        Some(path) => ManagerConfig::with_settings_file(scripts_root, &path),
        None => ManagerConfig::new(scripts_root),
    };

    let mut registry = LanguageRegistry::new();
    if let Some(dir) = cli.plugins.clone().or_else(plugin_dir_from_env) {
        registry.load_plugins(&dir);
    }

    Ok(ScriptManager::new(config, registry))
}

fn run_list(manager: &ScriptManager) {
    println!("Scripts ({})", manager.scripts_root().display());
    print_outline(&manager.scripts().outline());
    println!();
    println!("Hooks");
    print_outline(&manager.hooks().outline());
}

fn print_outline(lines: &[String]) {
    if lines.is_empty() {
        println!("  (none)");
    }
    for line in lines {
        println!("  {line}");
    }
}

fn run_script(manager: &ScriptManager, path: &Path, kind: &str, data: &[String]) -> Result<()> {
    let mut window = ScriptableWindow::new(kind, ConsoleNotifier, Vec::new());
    window.attach(manager);
    for entry in data {
        let (key, value) = parse_data(entry)?;
        window.set_data(key, value);
    }

    let Some(id) = window.action_for(path) else {
        bail!(
            "{} is not an enabled standalone script for {kind} windows",
            path.display()
        );
    };

    match window.trigger(manager, id) {
        Some(Ok(_)) => Ok(()),
        Some(Err(e)) => Err(e).context("Script failed"),
        None => Err(eyre!("Script vanished while running")),
    }
}

fn run_hooks(manager: &ScriptManager, hook: &str, kind: &str) {
    let mut window = ScriptableWindow::new(kind, ConsoleNotifier, Vec::new());
    window.attach(manager);
    let count = window.run_hooks(manager, hook);
    eprintln!("Ran {count} script(s) for {hook}");
}

/// Parse `KEY=VALUE`, reading VALUE as JSON when it is valid JSON.
fn parse_data(entry: &str) -> Result<(String, Value)> {
    let (key, raw) = entry
        .split_once('=')
        .ok_or_else(|| eyre!("Invalid data '{entry}', expected KEY=VALUE"))?;
    if key.is_empty() {
        bail!("Invalid data '{entry}', key is empty");
    }
    let value = Value::from_json(raw).unwrap_or_else(|_| Value::from(raw));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data() {
        let (key, value) = parse_data("count=3").unwrap();
        assert_eq!(key, "count");
        assert_eq!(value.as_i64(), Some(3));

        let (_, value) = parse_data("name=hello world").unwrap();
        assert_eq!(value.as_str(), Some("hello world"));

        let (_, value) = parse_data("eq=a=b").unwrap();
        assert_eq!(value.as_str(), Some("a=b"));

        assert!(parse_data("missing").is_err());
        assert!(parse_data("=1").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "quire", "--scripts", "/tmp/s", "run", "a.rhai", "-d", "x=1", "-d", "y=2",
        ])
        .unwrap();
        assert_eq!(cli.scripts.as_deref(), Some(Path::new("/tmp/s")));
        let Command::Run { data, window, .. } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(data, ["x=1", "y=2"]);
        assert_eq!(window, "TeXDocument");

        let cli = Cli::try_parse_from(["quire", "plugins", "on"]).unwrap();
        assert!(matches!(cli.command, Command::Plugins { state: Toggle::On }));
    }
}
