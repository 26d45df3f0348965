//! bunup-tools - Create bunup libraries and add bunup to existing projects

use anyhow::Result;
use bunup_scaffolder::templates::{TemplateKind, Variant};
use bunup_scaffolder::tui::{self, CreateArgs};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bunup-tools")]
#[command(about = "Create bunup libraries and add bunup to existing projects")]
#[command(version)]
pub struct Args {
    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new library from a template
    Create(CliCreateArgs),
    /// Add a bunup config and build scripts to the current project
    Init,
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Name of the project directory to create
    pub project_name: Option<String>,

    /// Template to use
    #[arg(short, long, value_enum)]
    pub template: Option<TemplateKind>,

    /// Template variant
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Local checkout to read templates from instead of downloading (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            project_name: args.project_name,
            template: args.template,
            variant: args.variant,
            template_dir: args.template_dir,
        }
    }
}

async fn dispatch(command: Option<Command>) -> Result<()> {
    match command {
        Some(Command::Create(create_args)) => tui::run_create(create_args.into()).await,
        Some(Command::Init) => tui::run_init().await,
        // No subcommand provided, default to create behavior (interactive mode)
        None => tui::run_create(CreateArgs::default()).await,
    }
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    if let Err(e) = bunup_scaffolder::init_logging(args.verbose) {
        eprintln!("{}", e);
    }

    let result = dispatch(args.command).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        if tui::is_cancelled(&e) {
            let _ = cliclack::outro_cancel("Operation cancelled");
        } else {
            tracing::debug!(error = ?e, "command failed");
            let _ = cliclack::outro_cancel(format!("{:#}", e));
        }
        std::process::exit(1);
    }
}
