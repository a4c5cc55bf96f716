use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scopehound")]
#[command(about = "Recon pipeline: enumerate subdomains, probe them, harvest historical URLs")]
#[command(version)]
pub struct Cli {
    /// Create default configuration file at ./config/scopehound.toml
    #[arg(long)]
    pub init: bool,

    /// Single target domain to scan (takes precedence over --input)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// File with one target domain per line (blank lines and # comments skipped)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory for result files
    #[arg(short, long, default_value = "output", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Verbose logging (use -v for detailed progress, -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run subfinder, crt.sh, and amass concurrently instead of one after another
    #[arg(long)]
    pub parallel_sources: bool,

    /// Suppress the startup banner
    #[arg(long)]
    pub no_banner: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(d) = &self.domain {
            if d.trim().is_empty() {
                return Err("Domain cannot be empty".to_string());
            }
        }

        if let Some(path) = &self.input {
            if path.as_os_str().is_empty() {
                return Err("Input file path cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Whether any target was supplied at all. A run without one is not an
    /// error, it just prints usage guidance and exits cleanly.
    pub fn has_target(&self) -> bool {
        self.domain.is_some() || self.input.is_some()
    }
}
