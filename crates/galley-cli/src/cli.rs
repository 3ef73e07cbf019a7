use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for the `gly` binary.
#[derive(Debug, Parser)]
#[command(name = "gly", version, about = "Galley - analysis workspace server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    Raw,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the protocol server
    Serve,

    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },

    /// Manage analyses
    Analysis {
        #[command(subcommand)]
        action: AnalysisCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// Create an account
    Add {
        name: String,
        /// Grant visibility over every project
        #[arg(long)]
        admin: bool,
    },
    /// List accounts
    List,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommands {
    /// Create a project
    Create {
        name: String,
        /// Owning account name
        #[arg(long)]
        owner: String,
        /// Audience: internal, user, public
        #[arg(long, default_value = "user")]
        usage: String,
    },
    /// List projects
    List,
}

#[derive(Debug, Subcommand)]
pub enum AnalysisCommands {
    /// Add an analysis to a project from a document and template
    Add {
        /// Target project name
        #[arg(long)]
        project: String,
        /// The analysis document file (JSON)
        #[arg(long)]
        spec: PathBuf,
        /// The template file for the analysis
        #[arg(long)]
        template: PathBuf,
        /// Audience: internal, user, public
        #[arg(long, default_value = "user")]
        usage: String,
        /// Also reclassify the target project's audience
        #[arg(long)]
        project_usage: Option<String>,
        /// Also create a queued job for the analysis
        #[arg(long)]
        create_job: bool,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analysis_add_parses() {
        let cli = Cli::try_parse_from([
            "gly",
            "analysis",
            "add",
            "--project",
            "demo",
            "--spec",
            "spec.json",
            "--template",
            "run.sh",
            "--create-job",
        ])
        .expect("cli should parse");

        match cli.command {
            Commands::Analysis { action } => {
                let super::AnalysisCommands::Add {
                    project,
                    create_job,
                    usage,
                    ..
                } = action;
                assert_eq!(project, "demo");
                assert!(create_job);
                assert_eq!(usage, "user");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["gly", "user", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["gly", "--format", "xml", "user", "list"]);
        assert!(parsed.is_err());
    }
}
