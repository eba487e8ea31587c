use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "themes - Interactive theme manager")]
pub struct Cli {
    /// Configuration file (default: ./themes.json)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Cache directory for the plugin registry snapshot
    #[arg(short, long)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Install a new theme
    Install {
        /// URL or filesystem path to a ZIP/directory; prompts when omitted
        #[arg(short, long)]
        source: Option<String>,
        /// Leave the theme inactive after installing it
        #[arg(long)]
        no_activate: bool,
    },
    /// Uninstall an existing theme
    Uninstall {
        /// Theme to uninstall; prompts when omitted
        #[arg(short = 'p', long)]
        theme: Option<String>,
    },
    /// Change the theme in use
    Change {
        /// Theme to activate; prompts when omitted
        #[arg(short, long)]
        theme: Option<String>,
    },
    /// List installed themes
    List,
}

/// Help text shown for the menu's [H]elp entry.
pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}
