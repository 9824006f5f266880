use crate::demo::{print_plans, run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use garage_link::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Garage Link",
    about = "Run the Garage Link marketplace service from the command line",
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
    /// Print the published plan catalog
    Plans,
    /// Walk a client and a mechanic through the full request lifecycle
    Demo(DemoArgs),
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
        Command::Plans => print_plans(),
        Command::Demo(args) => run_demo(args),
    }
}
