//! Command-line interface for sql-randgen
//!
//! # Usage Examples
//!
//! ```bash
//! # Print the built-in zz
//! sql-randgen zz > default.zz
//!
//! # Tables and data only
//! sql-randgen gendata -Z default.zz -O run1 --seed 42
//!
//! # Statements only, against an empty schema
//! sql-randgen gensql -Y select.yy --skip-zz -Q 500
//!
//! # Endless statement stream, debug output with expansion paths
//! sql-randgen gensql -Y select.yy -Q -1 --debug
//!
//! # Data followed by statements from the same seed
//! sql-randgen gentest -Y select.yy --seed 42 --maxrecur 3
//! ```
//!
//! Output files are named after `--output`: `<output>.data.sql`,
//! `<output>.schema.json` and `<output>.rand.sql`.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sql_randgen::commands::{load_registry, run_gendata, run_gensql, run_gentest, run_print_zz};
use sql_randgen::GlobalOpts;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sql-randgen")]
#[command(about = "Grammar-driven random SQL generator for database fuzz testing")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random statements from a yy grammar
    Gensql,

    /// Generate tables and data from a zz file
    Gendata,

    /// Generate data, then statements from the same random stream
    Gentest,

    /// Print the built-in zz
    Zz,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let opts = cli.opts;

    // Initialize tracing on stderr so `zz` output stays clean; RUST_LOG wins over --debug
    let default_level = if opts.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = opts.seed();
    tracing::info!("Using seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    match cli.command {
        Commands::Gensql => {
            let registry = load_registry(&opts, &mut rng)?;
            run_gensql(&opts, registry, rng)?;
        }
        Commands::Gendata => {
            run_gendata(&opts, &mut rng)?;
        }
        Commands::Gentest => run_gentest(&opts, rng)?,
        Commands::Zz => run_print_zz(),
    }

    Ok(())
}
