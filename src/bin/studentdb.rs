use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use studentdb::config::EXAMPLE_CONFIG;
use studentdb::*;
use tracing::Level;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// configuration file path, by default $HOME/.studentdb/studentdb.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format for student rows
    #[clap(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Print the loaded configuration and exit
    #[clap(long)]
    show_config: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = match StudentDbConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("example configuration:\n\n{}", EXAMPLE_CONFIG);
            return Err(e);
        }
    };

    if cli.show_config {
        println!("{}", config.summary());
        return Ok(());
    }

    config.warn_unused();
    let db = open_configured(&config)?;

    println!(
        "Connected to database '{}' as user '{}'.",
        config.dbname, config.user
    );
    if db.schema_status()? == SchemaStatus::NotInitialized {
        println!("The students table does not exist yet, run `init` to create it.");
    }

    let mut shell = StudentShell::new(db, cli.format);
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        shell.run_interactive(std::io::stdout())
    } else {
        shell.run(stdin.lock(), std::io::stdout())
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level INFO or higher.
            .with_max_level(Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(1);
    }
}
