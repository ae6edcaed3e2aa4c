mod commands;
mod platform;
mod shutdown;
mod terminal;

use commands::{CommandLine, Commands, import, probe, restore};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let out = commands.output();

    logging::init_logging(commands.verbose, &out);
    print::banner(out.no_banner, out.quiet);

    let result = match commands.command {
        Commands::Probe(args) => probe::probe(args, &out).await,
        Commands::Import { hosts } => import::import(hosts.as_deref(), &out).await,
        Commands::Restore { backup, hosts } => restore::restore(backup, hosts.as_deref(), &out).await,
    };

    if out.quiet == 0 {
        print::end_of_program();
    }
    result
}
