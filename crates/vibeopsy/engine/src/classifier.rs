//! The classifier seam presentation code calls into.
//!
//! [`SyntheticClassifier`] wraps the synthesizer; remote inference lives in
//! its own crate behind the same trait. [`DelayedClassifier`] adds the
//! artificial scan latency of the kiosk without touching the engine.

use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{watch, Mutex};
use tracing::info;
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Artifact, Distribution, ScanResult, Strategy};

use crate::synthesizer::Synthesizer;

/// Anything that turns an artifact into a distribution.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Score `artifact` against [`Classifier::registry`].
    async fn classify(&self, artifact: &Artifact) -> ScanResult<Distribution>;

    /// Taxonomy every returned distribution covers.
    fn registry(&self) -> &TaxonomyRegistry;

    /// Short name for logs and receipts.
    fn name(&self) -> &str;
}

/// Classifier backed by the synthetic engine.
pub struct SyntheticClassifier {
    synthesizer: Synthesizer,
    strategy: Strategy,
    rng: Mutex<StdRng>,
}

impl SyntheticClassifier {
    /// Classifier with an entropy-seeded random source.
    pub fn new(synthesizer: Synthesizer, strategy: Strategy) -> Self {
        Self::with_rng(synthesizer, strategy, StdRng::from_entropy())
    }

    /// Classifier with a reproducible random source.
    pub fn seeded(synthesizer: Synthesizer, strategy: Strategy, seed: u64) -> Self {
        Self::with_rng(synthesizer, strategy, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(synthesizer: Synthesizer, strategy: Strategy, rng: StdRng) -> Self {
        Self {
            synthesizer,
            strategy,
            rng: Mutex::new(rng),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }
}

#[async_trait]
impl Classifier for SyntheticClassifier {
    async fn classify(&self, artifact: &Artifact) -> ScanResult<Distribution> {
        info!(
            file = %artifact.file_name,
            strategy = %self.strategy,
            "synthetic classification"
        );
        let mut rng = self.rng.lock().await;
        self.synthesizer
            .synthesize(artifact.identifier(), self.strategy, &mut *rng)
    }

    fn registry(&self) -> &TaxonomyRegistry {
        self.synthesizer.registry()
    }

    fn name(&self) -> &str {
        self.strategy.as_str()
    }
}

/// Number of progress updates a delayed scan publishes.
pub const PROGRESS_STEPS: u32 = 20;

/// Decorator that waits out a fixed scan delay before delegating.
///
/// Progress (0-100 in steps of 5) is published on an optional watch channel
/// while waiting.
pub struct DelayedClassifier<C> {
    inner: C,
    delay: Duration,
    progress: Option<watch::Sender<u8>>,
}

impl<C: Classifier> DelayedClassifier<C> {
    pub fn new(inner: C, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            progress: None,
        }
    }

    /// Publish scan progress and return the receiving end.
    pub fn with_progress(mut self) -> (Self, watch::Receiver<u8>) {
        let (tx, rx) = watch::channel(0);
        self.progress = Some(tx);
        (self, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    async fn wait(&self) {
        match &self.progress {
            None => tokio::time::sleep(self.delay).await,
            Some(tx) => {
                let _ = tx.send(0);
                let tick = self.delay / PROGRESS_STEPS;
                for step in 1..=PROGRESS_STEPS {
                    tokio::time::sleep(tick).await;
                    let _ = tx.send((step * 100 / PROGRESS_STEPS) as u8);
                }
            }
        }
    }
}

#[async_trait]
impl<C: Classifier> Classifier for DelayedClassifier<C> {
    async fn classify(&self, artifact: &Artifact) -> ScanResult<Distribution> {
        self.wait().await;
        self.inner.classify(artifact).await
    }

    fn registry(&self) -> &TaxonomyRegistry {
        self.inner.registry()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[async_trait]
impl<C: Classifier + ?Sized> Classifier for Box<C> {
    async fn classify(&self, artifact: &Artifact) -> ScanResult<Distribution> {
        (**self).classify(artifact).await
    }

    fn registry(&self) -> &TaxonomyRegistry {
        (**self).registry()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
