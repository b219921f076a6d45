use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// "0.3.2" for releases, "0.3.2@abc1234" for dev builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "rankvault",
    bin_name = "rankvault",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Account book grouped by server, with scraped ranks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server to operate on (defaults to the current one)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub server: Option<String>,

    /// Data directory (defaults to $RANKVAULT_DATA, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Accounts,
    Servers,
    Ranks,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Accounts => "Account Commands:",
            CommandGroup::Servers => "Server Commands:",
            CommandGroup::Ranks => "Rank Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "list" | "add" | "remove" | "rename" | "move" | "sort" | "copy" | "info" => {
                Some(CommandGroup::Accounts)
            }
            "server" | "use" => Some(CommandGroup::Servers),
            "refresh" | "urls" => Some(CommandGroup::Ranks),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Accounts,
            CommandGroup::Servers,
            CommandGroup::Ranks,
            CommandGroup::Misc,
        ]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("rankvault {version}\n"));
    output.push_str("Account book grouped by server, with scraped ranks\n");
    output.push('\n');
    output.push_str("Usage: rankvault [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();
    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", sc.get_name(), about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -s, --server <SERVER>  Server to operate on\n");
    output.push_str("      --data-dir <DIR>   Data directory\n");
    output.push_str("  -v, --verbose          Verbose output\n");
    output.push_str("  -h, --help             Print help\n");
    output.push_str("  -V, --version          Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints clap's help for the subcommand `name`, or the grouped help if
/// there is no such subcommand.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();
    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }
    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::List => "list",
            Commands::Add { .. } => "add",
            Commands::Remove { .. } => "remove",
            Commands::Rename { .. } => "rename",
            Commands::Move { .. } => "move",
            Commands::Sort { .. } => "sort",
            Commands::Copy { .. } => "copy",
            Commands::Info { .. } => "info",
            Commands::Server { .. } => "server",
            Commands::Use { .. } => "use",
            Commands::Refresh => "refresh",
            Commands::Urls => "urls",
            Commands::Config { .. } => "config",
            Commands::Help { .. } => "help",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List accounts of the server
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Add an account
    #[command(display_order = 2)]
    Add {
        /// Display name, also the name looked up on the ranking site (e.g. Name#TAG)
        name: String,
        /// Login id
        id: String,
        /// Password
        password: String,
    },

    /// Remove every account with the given id
    #[command(alias = "rm", display_order = 3)]
    Remove { id: String },

    /// Rename an account
    #[command(display_order = 4)]
    Rename {
        id: String,
        /// New display name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Swap an account with the one at a position (1-based)
    #[command(alias = "mv", display_order = 5)]
    Move { id: String, position: String },

    /// Sort accounts by usage, solo or flex rank (best first)
    #[command(display_order = 6)]
    Sort {
        /// usage | solo | flex
        key: String,
    },

    /// Copy an account's id (or password) to the clipboard
    #[command(alias = "cp", display_order = 7)]
    Copy {
        id: String,
        /// Copy the password instead of the id
        #[arg(short, long)]
        password: bool,
    },

    /// Show one account's usage and ranks
    #[command(display_order = 8)]
    Info { id: String },

    /// Add, remove or list servers
    #[command(display_order = 10)]
    Server {
        #[command(subcommand)]
        action: Option<ServerAction>,
    },

    /// Make a server the current one
    #[command(display_order = 11)]
    Use { server: String },

    /// Look up the ranks of every account on every server
    #[command(display_order = 20)]
    Refresh,

    /// Print the profile URLs a refresh would request
    #[command(display_order = 21)]
    Urls,

    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (e.g. profile_url)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for rankvault or a subcommand
    #[command(display_order = 31)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServerAction {
    /// Add a server (stored upper-cased)
    Add { name: String },
    /// Remove a server and all of its accounts
    #[command(alias = "rm")]
    Remove { name: String },
    /// List servers
    #[command(alias = "ls")]
    List,
}
