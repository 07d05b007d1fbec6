//! Options shared by every subcommand.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

/// Global options, accepted before or after the subcommand.
#[derive(Args, Clone, Debug)]
pub struct GlobalOpts {
    /// zz file path; the built-in default zz is used when omitted
    #[arg(short = 'Z', long, global = true, env = "RANDGEN_ZZ")]
    pub zz: Option<PathBuf>,

    /// yy file path, required by gensql and gentest
    #[arg(short = 'Y', long, global = true, env = "RANDGEN_YY")]
    pub yy: Option<PathBuf>,

    /// Number of statements to generate; negative streams without end
    #[arg(
        short = 'Q',
        long,
        global = true,
        default_value_t = 100,
        allow_negative_numbers = true
    )]
    pub queries: i64,

    /// Root rule of the yy grammar
    #[arg(short = 'R', long, global = true, default_value = "query")]
    pub root: String,

    /// Entries per rule allowed on one expansion path; <= 0 is unbounded
    #[arg(long, global = true, default_value_t = 5, allow_negative_numbers = true)]
    pub maxrecur: i64,

    /// Log debug output, including the expansion path of every statement
    #[arg(long, global = true)]
    pub debug: bool,

    /// Skip the zz phase and generate statements against an empty schema
    #[arg(long, global = true)]
    pub skip_zz: bool,

    /// Random seed; derived from the clock when omitted
    #[arg(long, global = true, env = "RANDGEN_SEED")]
    pub seed: Option<u64>,

    /// Output path prefix
    #[arg(short = 'O', long, global = true, default_value = "output")]
    pub output: String,
}

impl Default for GlobalOpts {
    fn default() -> Self {
        Self {
            zz: None,
            yy: None,
            queries: 100,
            root: "query".to_string(),
            maxrecur: 5,
            debug: false,
            skip_zz: false,
            seed: None,
            output: "output".to_string(),
        }
    }
}

impl GlobalOpts {
    /// The configured seed, or one derived from the current time.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let now = chrono::Utc::now();
            now.timestamp_nanos_opt()
                .map_or(now.timestamp() as u64, |nanos| nanos as u64)
        })
    }

    /// zz text; empty when no zz file is given, which selects the default zz.
    pub fn load_zz(&self) -> anyhow::Result<String> {
        match &self.zz {
            Some(path) => {
                tracing::info!("Loading zz from {}", path.display());
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read zz file: {}", path.display()))
            }
            None => {
                tracing::info!("Loading default zz");
                Ok(String::new())
            }
        }
    }

    pub fn load_yy(&self) -> anyhow::Result<String> {
        let path = self
            .yy
            .as_ref()
            .context("A yy file is required (--yy)")?;
        tracing::info!("Loading yy from {}", path.display());
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read yy file: {}", path.display()))
    }

    /// `<output>.<suffix>`
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        PathBuf::from(format!("{}.{suffix}", self.output))
    }
}
