// Allow dead code for functions that are part of the API surface but not used in all code paths
#![allow(dead_code)]

use clap::Parser;
use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod crtsh;
mod hosts;
mod interrupt;
mod logger;
mod output;
mod rate_limit;
mod runner;
mod stages;

use cli::Cli;
use config::AppConfig;
use crtsh::CrtShClient;
use logger::{RunLogger, VerbosityLevel};
use output::OutputLayout;
use rate_limit::SharedRateLimiter;
use runner::ToolRunner;
use stages::{EnumerateStage, ProbeStage, WaybackStage};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle --init flag first (before any other processing)
    if cli.init {
        match AppConfig::create_default_config() {
            Ok(path) => {
                println!("✅ Created default configuration file at: {}", path.display());
                println!("   Edit this file to customize settings, then run scopehound again.");
                return Ok(());
            }
            Err(e) => {
                eprintln!("❌ Failed to create configuration file: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Module-level diagnostics go through tracing; RUST_LOG overrides the default
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();

    // Load configuration (a missing file means compiled-in defaults)
    let config = match AppConfig::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let verbosity = VerbosityLevel::from_verbose_count(cli.verbose);
    let logger = Arc::new(RunLogger::new(verbosity));

    // Validate arguments
    if let Err(e) = cli.validate() {
        logger.error(&format!("Invalid arguments: {}", e));
        std::process::exit(1);
    }

    // A run without a target is usage guidance, not an error
    if !cli.has_target() {
        println!("Please provide a target: --domain <host> or --input <file>.");
        println!("Run with --help for the full option list.");
        return Ok(());
    }

    if !cli.no_banner {
        print_banner();
    }

    // Ctrl-C sets the interrupt flag; stages stop at their next loop
    // boundary. The forced exit after a grace period is the backstop for
    // a tool invocation that won't return.
    ctrlc::set_handler(move || {
        interrupt::trigger();
        eprintln!("\n⚠️  Interrupt received. Finishing the write in flight, then stopping...");
        std::thread::sleep(std::time::Duration::from_secs(2));
        eprintln!("⚠️  Force exiting (files already flushed remain valid).");
        std::process::exit(130); // 130 = 128 + SIGINT(2), standard exit code for Ctrl-C
    })
    .unwrap_or_else(|e| {
        eprintln!(
            "⚠️  Warning: Failed to set Ctrl-C handler: {}. Interrupt signals may not be handled gracefully.",
            e
        );
    });

    // Resolve the target list; --domain wins over --input
    let domains: Vec<String> = if let Some(domain) = &cli.domain {
        let domain = domain.trim().to_lowercase();
        if !hosts::is_valid_domain(&domain) {
            logger.error(&format!("'{}' does not look like a domain name", domain));
            std::process::exit(1);
        }
        vec![domain]
    } else if let Some(input) = &cli.input {
        hosts::read_domain_list(input)?
    } else {
        Vec::new()
    };

    if domains.is_empty() {
        println!("No target domains to scan.");
        return Ok(());
    }

    logger.record_target_domains(domains.len());
    logger.mark_run_started();

    let layout = OutputLayout::create(&cli.output_dir)?;
    logger.info(&format!("Results will be written to {}", layout.dir().display()));

    // Build the pipeline from the configured tool paths
    let limiter = SharedRateLimiter::new(config.limits.crtsh_requests_per_second);
    let enumerate = EnumerateStage {
        subfinder: ToolRunner::new(&config.tools.subfinder_path, config.tools.subfinder_timeout_secs),
        amass: ToolRunner::new(&config.tools.amass_path, config.tools.amass_timeout_secs),
        crtsh: CrtShClient::new(&config.http, limiter),
        parallel_sources: cli.parallel_sources,
    };
    let probe = ProbeStage {
        httpx: ToolRunner::new(&config.tools.httpx_path, config.tools.httpx_timeout_secs),
    };
    let wayback = WaybackStage {
        waybackurls: ToolRunner::new(
            &config.tools.waybackurls_path,
            config.tools.waybackurls_timeout_secs,
        ),
    };

    print_tool_status(&enumerate, &probe, &wayback);

    // Stage 1: merge subfinder, crt.sh, and amass into the subdomain set
    let subdomains = enumerate.run(&domains, &layout, &logger).await?;
    logger.record_subdomains_found(subdomains.len());

    if interrupt::is_interrupted() {
        finish_interrupted(&logger);
    }

    // Stage 2: probe the set and bucket by status
    let probe_summary = probe.run(&subdomains, &layout, &logger).await?;
    logger.record_probe_buckets(
        probe_summary.ok,
        probe_summary.client_gone,
        probe_summary.server_error,
    );

    if interrupt::is_interrupted() {
        finish_interrupted(&logger);
    }

    // Stage 3: harvest historical URLs, hosts in persisted order
    let hosts_in_order: Vec<String> = subdomains.iter().cloned().collect();
    let wayback_summary = wayback.run(&hosts_in_order, &layout, &logger).await?;
    logger.record_wayback_urls(wayback_summary.url_count);
    logger.record_hosts_harvested(wayback_summary.hosts_covered, wayback_summary.hosts_total);

    if wayback_summary.interrupted {
        finish_interrupted(&logger);
    }

    logger.mark_run_finished();
    logger.print_final_summary();

    Ok(())
}

/// Print the partial-results summary and exit with the SIGINT convention.
fn finish_interrupted(logger: &RunLogger) -> ! {
    logger.record_interrupted();
    logger.mark_run_finished();
    logger.print_final_summary();
    std::process::exit(130);
}

fn print_banner() {
    println!();
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║  scopehound - recon pipeline                                   ║");
    println!("║  subdomain enumeration, HTTP probing, wayback harvesting       ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    println!();
}

/// One status line per external tool, before the pipeline starts. A
/// missing binary is not fatal; its stage just contributes nothing.
fn print_tool_status(enumerate: &EnumerateStage, probe: &ProbeStage, wayback: &WaybackStage) {
    let runners = [
        &enumerate.subfinder,
        &enumerate.amass,
        &probe.httpx,
        &wayback.waybackurls,
    ];

    eprintln!();
    for runner in runners {
        if runner.is_available() {
            eprintln!("✅ READY: {}", runner.name());
        } else {
            eprintln!("⚠️  MISSING: {} (its stage will contribute nothing)", runner.name());
        }
    }
    eprintln!();
}
