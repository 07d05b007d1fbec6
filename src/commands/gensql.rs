//! `gensql` command handler.

use crate::GlobalOpts;
use anyhow::Context;
use rand::rngs::StdRng;
use randgen_core::KeyFunRegistry;
use randgen_grammar::{parse, Expansion, Session, StatementLimit};
use std::io::{BufWriter, Write};
use std::sync::Arc;

/// Generate statements from the yy and write `<output>.rand.sql`.
///
/// Returns the number of statements written. A negative `--queries` streams
/// until generation fails or the process is stopped.
pub fn run_gensql(
    opts: &GlobalOpts,
    registry: KeyFunRegistry,
    rng: StdRng,
) -> anyhow::Result<u64> {
    let yy = opts.load_yy()?;
    let registry = Arc::new(registry);
    let grammar = parse(&yy, &registry).context("Failed to parse yy")?;
    tracing::info!("Parsed yy with {} rules", grammar.len());

    let mut session = Session::builder(Arc::new(grammar), registry)
        .root(opts.root.as_str())
        .max_recursion(opts.maxrecur)
        .trace(opts.debug)
        .rng(rng)
        .build()
        .context("Failed to set up statement generation")?;

    let path = opts.output_path("rand.sql");
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let written = match StatementLimit::from(opts.queries) {
        StatementLimit::Bounded(count) => {
            let expansions = session
                .generate_batch_traced(count)
                .context("Failed to generate statements")?;
            expansions.iter().for_each(log_trace);
            let sql: Vec<String> = expansions.into_iter().map(|e| e.sql).collect();
            write_statements(&mut out, &sql)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            sql.len() as u64
        }
        StatementLimit::Unbounded => {
            tracing::info!("Streaming statements to {} without limit", path.display());
            let mut stream = session.open_stream(StatementLimit::Unbounded);
            let mut written = 0u64;
            while let Some(expansion) = stream
                .next_statement()
                .context("Failed to generate statement")?
            {
                log_trace(&expansion);
                writeln!(out, "{};", expansion.sql)
                    .and_then(|_| out.flush())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                written += 1;
            }
            written
        }
    };

    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {written} statements to {}", path.display());
    Ok(written)
}

/// Write statements joined by `;\n` with a final `;`.
pub fn write_statements<W: Write>(out: &mut W, statements: &[String]) -> std::io::Result<()> {
    write!(out, "{};", statements.join(";\n"))
}

fn log_trace(expansion: &Expansion) {
    if let Some(trace) = &expansion.trace {
        let path: Vec<String> = trace
            .iter()
            .map(|step| format!("{}#{}", step.rule, step.alternative))
            .collect();
        tracing::debug!("{} <- {}", expansion.sql, path.join(" > "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_statements() {
        let mut out = Vec::new();
        write_statements(&mut out, &["SELECT 1".to_string(), "SELECT 2".to_string()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "SELECT 1;\nSELECT 2;");
    }
}
