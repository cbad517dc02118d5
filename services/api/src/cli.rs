use crate::demo::{run_demo, run_eligibility_check, run_scheme_listing, CheckArgs, ListArgs};
use crate::server;
use actisathi::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ActiSathi",
    about = "Match citizens to welfare schemes and take in civic issue reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the welfare scheme catalog
    Schemes {
        #[command(subcommand)]
        command: SchemesCommand,
    },
    /// Evaluate an applicant profile from the command line
    Eligibility {
        #[command(subcommand)]
        command: EligibilityCommand,
    },
    /// Run a sample profile and a sample issue report through both pipelines
    Demo,
}

#[derive(Subcommand, Debug)]
enum SchemesCommand {
    /// List every scheme in the catalog
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
enum EligibilityCommand {
    /// Check a JSON profile against the catalog
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Schemes {
            command: SchemesCommand::List(args),
        } => run_scheme_listing(args),
        Command::Eligibility {
            command: EligibilityCommand::Check(args),
        } => run_eligibility_check(args),
        Command::Demo => run_demo(),
    }
}
