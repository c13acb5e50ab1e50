//! Scan an image file

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;
use vibeopsy_engine::{
    ranking, Classifier, DelayedClassifier, Prediction, Ranked, Synthesizer, SyntheticClassifier,
};
use vibeopsy_inference::InferenceClassifier;
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Artifact, Strategy};

use crate::config::ScanConfig;
use crate::error::{CliError, CliResult};
use crate::output::{print_structured, OutputFormat};
use crate::render::{lesion_table, percent, progress_line, Receipt};

/// Arguments for `vibeopsy scan`
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image file to scan
    pub file: PathBuf,

    /// Synthesis strategy (tiered-random, deterministic-hash)
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// RNG seed for a reproducible tiered-random scan
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulated scan latency in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Classify with the remote inference endpoint
    #[arg(long)]
    pub remote: bool,

    /// Inference endpoint URL (implies --remote)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Print a receipt for the headline diagnosis
    #[arg(long)]
    pub receipt: bool,
}

#[derive(Serialize)]
struct ScanReport<'a> {
    file: &'a str,
    classifier: &'a str,
    prediction: &'a Prediction,
    ranking: Vec<Ranked<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<&'a Receipt>,
}

/// Execute the scan command
pub async fn execute(args: ScanArgs, config: &ScanConfig, format: OutputFormat) -> CliResult<()> {
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::InvalidArgument(format!("not a file: {}", args.file.display())))?;
    let bytes = tokio::fs::read(&args.file).await?;
    let artifact = Artifact::new(file_name, bytes);

    let registry = config.registry()?;
    let delay = Duration::from_millis(args.delay_ms.unwrap_or(config.classifier.scan_delay_ms));
    let classifier = DelayedClassifier::new(build_classifier(&args, config, registry.clone())?, delay);
    let classifier_name = classifier.name().to_string();

    let distribution = if format == OutputFormat::Table && !delay.is_zero() {
        let (classifier, progress) = classifier.with_progress();
        let reporter = tokio::spawn(report_progress(progress));
        let result = classifier.classify(&artifact).await;
        drop(classifier);
        let _ = reporter.await;
        result?
    } else {
        classifier.classify(&artifact).await?
    };

    let prediction = Prediction::from_distribution(&registry, &distribution)?;
    let receipt = args
        .receipt
        .then(|| Receipt::new(&prediction, &mut rand::thread_rng()));

    let report = ScanReport {
        file: &artifact.file_name,
        classifier: &classifier_name,
        prediction: &prediction,
        ranking: ranking::ranked(&registry, &distribution)?,
        receipt: receipt.as_ref(),
    };
    if print_structured(format, &report)? {
        return Ok(());
    }

    println!("{} {} ({})", "FILE".bold(), artifact.file_name, classifier_name.dimmed());
    print!("{}", lesion_table(&registry, Some(&distribution)));
    println!();
    print_headline(&registry, &prediction);

    if let Some(receipt) = &receipt {
        println!();
        print!("{}", receipt.render());
    }
    Ok(())
}

fn build_classifier(
    args: &ScanArgs,
    config: &ScanConfig,
    registry: TaxonomyRegistry,
) -> CliResult<Box<dyn Classifier>> {
    if args.remote || args.endpoint.is_some() || config.inference.enabled {
        let mut inference = config.inference.clone();
        if let Some(endpoint) = &args.endpoint {
            inference.endpoint = endpoint.clone();
        }
        info!(endpoint = %inference.endpoint, "using remote inference");
        return Ok(Box::new(InferenceClassifier::new(&inference, registry)?));
    }

    let synthesizer = Synthesizer::new(registry, config.engine.clone())?;
    let strategy = args.strategy.unwrap_or(config.classifier.strategy);
    let classifier = match args.seed.or(config.classifier.seed) {
        Some(seed) => SyntheticClassifier::seeded(synthesizer, strategy, seed),
        None => SyntheticClassifier::new(synthesizer, strategy),
    };
    Ok(Box::new(classifier))
}

async fn report_progress(mut progress: watch::Receiver<u8>) {
    let mut stderr = std::io::stderr();
    loop {
        let value = *progress.borrow_and_update();
        let _ = write!(stderr, "\r{}", progress_line(value));
        let _ = stderr.flush();
        if value >= 100 || progress.changed().await.is_err() {
            break;
        }
    }
    let _ = writeln!(stderr);
}

fn print_headline(registry: &TaxonomyRegistry, prediction: &Prediction) {
    let code = registry
        .get(prediction.predicted_class)
        .map(|c| c.code.as_str())
        .unwrap_or("?");
    let verdict = if prediction.is_cancer {
        "MALIGNANT".red().bold()
    } else {
        "BENIGN".green().bold()
    };
    println!(
        "{} {} ({}) {} confidence {}",
        "DIAGNOSIS".bold(),
        prediction.diagnosis.bold(),
        code,
        verdict,
        percent(prediction.confidence_fraction())
    );
}
