use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::RwLock;
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum VerbosityLevel {
    Silent = 0,    // Only show progress bar and final summary
    Summary = 1,   // High-level pipeline progress (default)
    Detailed = 2,  // Per-source results, warnings
    Debug = 3,     // All messages including per-host debug info
}

impl VerbosityLevel {
    pub fn from_verbose_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Summary,
            1 => VerbosityLevel::Detailed,
            2.. => VerbosityLevel::Debug,
        }
    }
}

#[derive(Clone)]
pub struct RunLogger {
    verbosity: VerbosityLevel,
    progress_bar: Arc<RwLock<Option<ProgressBar>>>,
    run_metadata: Arc<Mutex<RunMetadata>>,
}

#[derive(Default, Clone)]
struct RunMetadata {
    start_time: Option<SystemTime>,
    end_time: Option<SystemTime>,
    target_domains: usize,
    subdomains_found: usize,
    live_ok: usize,
    live_client_gone: usize,
    live_server_error: usize,
    wayback_urls: usize,
    hosts_harvested: usize,
    hosts_total: usize,
    interrupted: bool,
}

impl RunLogger {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: Arc::new(RwLock::new(None)),
            run_metadata: Arc::new(Mutex::new(RunMetadata::default())),
        }
    }

    // Core logging functions with consistent timestamp formatting
    pub fn info(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("INFO", message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Detailed {
            self.print_message("WARN", message);
        }
    }

    pub fn error(&self, message: &str) {
        // Errors are never hidden, regardless of verbosity
        self.print_message("ERROR", message);
    }

    pub fn debug(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Debug {
            self.print_message("DEBUG", message);
        }
    }

    fn print_message(&self, level: &str, message: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        let msg = format!("[{}] {}: {}", timestamp, level, message);

        // Route through an active progress bar so log lines don't corrupt it
        if let Ok(guard) = self.progress_bar.try_read() {
            if let Some(pb) = guard.as_ref() {
                pb.println(msg);
                return;
            }
        }

        eprintln!("{}", msg);
    }

    pub fn mark_run_started(&self) {
        let mut metadata = self.run_metadata.lock().unwrap();
        metadata.start_time = Some(SystemTime::now());
    }

    pub fn mark_run_finished(&self) {
        let mut metadata = self.run_metadata.lock().unwrap();
        metadata.end_time = Some(SystemTime::now());
    }

    // Progress bar management for the per-host harvest loop
    pub async fn start_progress(&self, total_steps: u64) {
        let pb = ProgressBar::new(total_steps);

        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| {
                    ProgressStyle::default_bar()
                        .template("{bar:40} {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                })
                .progress_chars("##-"),
        );

        pb.set_message("Starting...");

        let mut progress_guard = self.progress_bar.write().await;
        *progress_guard = Some(pb);
    }

    pub async fn update_progress(&self, message: &str) {
        if let Some(pb) = self.progress_bar.read().await.as_ref() {
            pb.set_message(message.to_string());
        }
    }

    pub async fn advance_progress(&self, steps: u64) {
        if let Some(pb) = self.progress_bar.read().await.as_ref() {
            pb.inc(steps);
        }
    }

    pub async fn finish_progress(&self, final_message: &str) {
        let mut progress_guard = self.progress_bar.write().await;
        if let Some(pb) = progress_guard.take() {
            pb.finish_and_clear();
        }
        drop(progress_guard);

        if self.verbosity >= VerbosityLevel::Summary {
            self.print_message("INFO", final_message);
        }
    }

    // Metadata recording functions
    pub fn record_target_domains(&self, count: usize) {
        let mut metadata = self.run_metadata.lock().unwrap();
        metadata.target_domains = count;
    }

    pub fn record_subdomains_found(&self, count: usize) {
        let mut metadata = self.run_metadata.lock().unwrap();
        metadata.subdomains_found = count;
    }

    pub fn record_probe_buckets(&self, ok: usize, client_gone: usize, server_error: usize) {
        let mut metadata = self.run_metadata.lock().unwrap();
        metadata.live_ok = ok;
        metadata.live_client_gone = client_gone;
        metadata.live_server_error = server_error;
    }

    pub fn record_wayback_urls(&self, count: usize) {
        let mut metadata = self.run_metadata.lock().unwrap();
        metadata.wayback_urls = count;
    }

    pub fn record_hosts_harvested(&self, covered: usize, total: usize) {
        let mut metadata = self.run_metadata.lock().unwrap();
        metadata.hosts_harvested = covered;
        metadata.hosts_total = total;
    }

    pub fn record_interrupted(&self) {
        let mut metadata = self.run_metadata.lock().unwrap();
        metadata.interrupted = true;
    }

    // Final summary message
    pub fn print_final_summary(&self) {
        let metadata = self.run_metadata.lock().unwrap();

        // Ensure clean output after progress bar
        print!("\x1b[2K\r");
        let _ = io::stdout().flush();

        // Always print summary regardless of verbosity level
        println!("\n=== RECON SUMMARY ===");

        if let (Some(start), Some(end)) = (metadata.start_time, metadata.end_time) {
            let duration = end.duration_since(start).unwrap_or_default();
            println!("Run Duration: {:.2}s", duration.as_secs_f64());
        }

        println!("Target Domains: {}", metadata.target_domains);
        println!("Subdomains Found: {}", metadata.subdomains_found);
        println!(
            "Probed Hosts: {} ok / {} forbidden-or-missing / {} server-error",
            metadata.live_ok, metadata.live_client_gone, metadata.live_server_error
        );
        println!("Historical URLs: {}", metadata.wayback_urls);
        if metadata.hosts_total > 0 {
            println!(
                "Hosts Harvested: {}/{}",
                metadata.hosts_harvested, metadata.hosts_total
            );
        }

        println!("=====================\n");

        if metadata.interrupted {
            println!(
                "⚠️  Run interrupted. Partial results for {}/{} hosts were saved.",
                metadata.hosts_harvested, metadata.hosts_total
            );
        } else if metadata.subdomains_found > 0 {
            println!(
                "✅ Recon completed successfully! Found {} subdomains.",
                metadata.subdomains_found
            );
        } else {
            println!("✅ Recon completed. No subdomains found.");
        }
    }
}
