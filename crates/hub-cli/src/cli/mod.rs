use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `hub` binary.
#[derive(Debug, Parser)]
#[command(name = "hub", version, about = "AfroTech Hub - app showcase and developer console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{AuthCommands, ConsoleCommands, ProfileCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["hub", "--format", "table", "--verbose", "apps"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Apps(ref args) if !args.featured));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["hub", "apps", "--featured", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Apps(ref args) if args.featured));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["hub", "--format", "xml", "apps"]).is_err());
    }

    #[test]
    fn default_format_is_json() {
        let cli = Cli::try_parse_from(["hub", "about"]).expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn nested_commands_parse() {
        let cli = Cli::try_parse_from(["hub", "auth", "login", "--google"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Auth { action: AuthCommands::Login(ref a) } if a.google));

        let cli = Cli::try_parse_from(["hub", "profile", "upgrade"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Profile { action: ProfileCommands::Upgrade }));

        let cli = Cli::try_parse_from([
            "hub", "console", "create", "--title", "Lens", "--description", "AI captions", "--tag", "Rust",
            "--tag", "Gemini",
        ])
        .expect("cli should parse");
        let Commands::Console { action: ConsoleCommands::Create(args) } = cli.command else {
            panic!("expected console create");
        };
        assert_eq!(args.tag, vec!["Rust".to_string(), "Gemini".to_string()]);
    }

    #[test]
    fn chat_message_is_optional() {
        let cli = Cli::try_parse_from(["hub", "chat"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Chat(ref a) if a.message.is_none()));
    }
}
