//! `gendata` command handler.

use crate::GlobalOpts;
use anyhow::Context;
use rand::rngs::StdRng;
use randgen_gendata::{interpret, ZzOutput};

/// Interpret the zz and write `<output>.data.sql` and `<output>.schema.json`.
pub fn run_gendata(opts: &GlobalOpts, rng: &mut StdRng) -> anyhow::Result<ZzOutput> {
    let zz = opts.load_zz()?;
    let output = interpret(&zz, rng).context("Failed to interpret zz")?;

    let data_path = opts.output_path("data.sql");
    std::fs::write(&data_path, format!("{};", output.ddls.join(";\n")))
        .with_context(|| format!("Failed to write {}", data_path.display()))?;
    tracing::info!(
        "Wrote {} DDL and data statements to {}",
        output.ddls.len(),
        data_path.display()
    );

    let schema_path = opts.output_path("schema.json");
    let json = output
        .schema
        .to_json()
        .context("Failed to serialize schema")?;
    std::fs::write(&schema_path, json)
        .with_context(|| format!("Failed to write {}", schema_path.display()))?;
    tracing::info!(
        "Wrote schema with {} tables to {}",
        output.schema.tables.len(),
        schema_path.display()
    );

    Ok(output)
}
