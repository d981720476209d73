use clap::Parser;
use pedsynth_core::documents::SkipCounts;
use pedsynth_core::output::EntityTable;
use pedsynth_core::{GenerationConfig, GenerationSettings, RunProfile, RunSummary};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line for a generation run.
///
/// Values are resolved in this order, first match wins: flag, environment
/// variable, YAML config file, built-in default.
#[derive(Parser, Debug)]
#[command(name = "pedsynth")]
#[command(about = "Generate a synthetic pediatric hospital dataset")]
struct Cli {
    /// Number of patients
    #[arg(long)]
    patients: Option<usize>,
    /// Base number of encounters per patient
    #[arg(long)]
    encounters: Option<u32>,
    /// Output directory
    #[arg(long, env = "PEDSYNTH_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
    /// Random seed
    #[arg(long, env = "PEDSYNTH_SEED")]
    seed: Option<u64>,
    /// Small run: 1000 patients with 3 encounters each
    #[arg(long)]
    test_run: bool,
    /// Gzip every output file
    #[arg(long)]
    compress: bool,
    /// YAML file with generation settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reference "now" (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    as_of: Option<String>,
    /// Patients per batch
    #[arg(long)]
    batch_size: Option<usize>,
    /// Upper bound on encounters that receive documents
    #[arg(long)]
    max_document_encounters: Option<usize>,
    /// Fraction of encounters considered for documents
    #[arg(long)]
    document_sample_rate: Option<f64>,
}

impl Cli {
    fn profile(&self) -> RunProfile {
        if self.test_run {
            RunProfile::TestRun
        } else {
            RunProfile::Full
        }
    }

    /// Layer flags over the config file (or defaults).
    fn settings(&self) -> anyhow::Result<GenerationSettings> {
        let mut settings = match &self.config {
            Some(path) => GenerationSettings::from_yaml_file(path)?,
            None => GenerationSettings::default(),
        };
        if let Some(patients) = self.patients {
            settings.patient_count = patients;
        }
        if let Some(encounters) = self.encounters {
            settings.encounters_per_patient = encounters;
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if self.compress {
            settings.compress = true;
        }
        if let Some(as_of) = &self.as_of {
            settings.as_of = as_of.clone();
        }
        if let Some(batch_size) = self.batch_size {
            settings.batch_size = batch_size;
        }
        if let Some(cap) = self.max_document_encounters {
            settings.max_document_encounters = cap;
        }
        if let Some(rate) = self.document_sample_rate {
            settings.document_sample_rate = rate;
        }
        self.profile().apply(&mut settings);
        Ok(settings)
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Generated dataset in {}", summary.output_dir.display());
    for table in EntityTable::ALL {
        println!("  {:<18} {:>10}", table.stem(), summary.count(table));
    }
    println!("  {:<18} {:>10}", "total", summary.total_records());
    if summary.skipped_documents.total() > 0 {
        println!(
            "Skipped documents: {}",
            skip_breakdown(&summary.skipped_documents)
        );
    }
    println!(
        "Completed {} batch(es) in {:.1}s",
        summary.batches,
        summary.elapsed.as_secs_f64()
    );
}

/// "empty_body=1"
fn skip_breakdown(skips: &SkipCounts) -> String {
    skips
        .iter()
        .map(|(reason, count)| format!("{reason}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pedsynth=info".parse()?)
                .add_directive("pedsynth_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = GenerationConfig::new(cli.settings()?)?;
    tracing::info!(
        patients = config.patient_count(),
        encounters_per_patient = config.encounters_per_patient(),
        as_of = %config.as_of(),
        "resolved configuration"
    );

    let summary = pedsynth_core::run(&config)?;
    print_summary(&summary);
    Ok(())
}
