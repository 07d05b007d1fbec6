//! Subcommand handlers.

pub mod gendata;
pub mod gensql;

pub use gendata::run_gendata;
pub use gensql::{run_gensql, write_statements};

use crate::GlobalOpts;
use anyhow::Context;
use rand::rngs::StdRng;
use randgen_core::{DatabaseSchema, KeyFunRegistry};
use randgen_gendata::{interpret, registry_for_schema, DEFAULT_ZZ};
use std::sync::Arc;

/// Key functions for statement generation: from the zz schema, or from an
/// empty schema with `--skip-zz`.
pub fn load_registry(opts: &GlobalOpts, rng: &mut StdRng) -> anyhow::Result<KeyFunRegistry> {
    if opts.skip_zz {
        tracing::info!("Skipping zz, key functions see an empty schema");
        return Ok(registry_for_schema(Arc::new(DatabaseSchema::default())));
    }
    let zz = opts.load_zz()?;
    let output = interpret(&zz, rng).context("Failed to interpret zz")?;
    Ok(output.registry)
}

/// `gentest`: data and statements from one random stream.
pub fn run_gentest(opts: &GlobalOpts, mut rng: StdRng) -> anyhow::Result<()> {
    let output = run_gendata(opts, &mut rng)?;
    run_gensql(opts, output.registry, rng)?;
    Ok(())
}

/// `zz`: print the default zz.
pub fn run_print_zz() {
    println!("{DEFAULT_ZZ}");
}
