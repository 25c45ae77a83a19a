//! Row-resampling bootstrap engine
//!
//! The engine draws `n` row indices with replacement for each of `R`
//! replicates, builds the replicate with [`Dataset::select_rows`], hands
//! it to the estimator and collects the estimate vectors in generation
//! order.
//!
//! Randomness comes from a `ChaCha8Rng` seeded from the configured seed.
//! With [`ResampleStream::Shared`] one generator feeds every replicate in
//! order and is never reseeded. With [`ResampleStream::PerReplicate`]
//! replicate `i` reads from sub-stream `i` of the same seed, which makes
//! each replicate independent of the others and allows parallel
//! execution with results identical to the sequential run.

use crate::config::{
    BootstrapConfig, ExecutionStrategy, FailurePolicy, ResampleStream,
};
use crate::BootstrapDistribution;
use causal_core::{Dataset, EstimateVector, Error, Estimator, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument, warn};

/// Outcome of one per-replicate computation: the estimate and the number
/// of redraws it took
type StreamOutcome = Result<(EstimateVector, usize)>;

/// Bootstrap engine configured through builder methods
///
/// # Example
///
/// ```rust
/// use causal_confidence::BootstrapEngine;
/// use causal_core::{estimator_fn, utils, Dataset};
///
/// let data = Dataset::builder()
///     .numeric("y", vec![1.0, 2.0, 3.0, 4.0])
///     .build()
///     .unwrap();
/// let mean_y = estimator_fn("mean_y", 1, |d: &Dataset| Ok(vec![utils::mean(d.numeric("y")?)]));
///
/// let engine = BootstrapEngine::new().with_replications(200).with_seed(7);
/// let dist = engine.run(&data, &mean_y).unwrap();
/// assert_eq!(dist.len(), 200);
/// assert_eq!(dist, engine.run(&data, &mean_y).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BootstrapEngine {
    config: BootstrapConfig,
}

impl BootstrapEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine from a full configuration
    pub fn from_config(config: BootstrapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Set the number of replicates
    pub fn with_replications(mut self, replications: usize) -> Self {
        self.config.replications = replications;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the confidence level used by interval methods
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.config.confidence_level = confidence_level;
        self
    }

    /// Set the estimator failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Set how resampling indices are generated
    pub fn with_stream(mut self, stream: ResampleStream) -> Self {
        self.config.stream = stream;
        self
    }

    /// Set the execution strategy
    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.config.execution = execution;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Run the bootstrap and collect one estimate vector per replicate
    ///
    /// # Errors
    /// - [`Error::InvalidInput`] for an empty dataset, zero replications,
    ///   an estimator of dimension zero or an invalid configuration
    /// - [`Error::EstimatorFailure`] when a replicate fails and the
    ///   failure policy does not allow (another) redraw
    #[instrument(skip(self, dataset, estimator),
                 fields(n = dataset.n_rows(), replications = self.config.replications, estimator = estimator.name()))]
    pub fn run<E>(&self, dataset: &Dataset, estimator: &E) -> Result<BootstrapDistribution>
    where
        E: Estimator + ?Sized,
    {
        if dataset.is_empty() {
            return Err(Error::empty_input("bootstrap"));
        }
        self.config.validate()?;

        let dimension = estimator.dimension();
        if dimension == 0 {
            return Err(Error::InvalidInput(format!(
                "Estimator {} declares an empty estimate vector",
                estimator.name()
            )));
        }
        let labels = estimator.labels();
        if labels.len() != dimension {
            return Err(Error::size_mismatch(dimension, labels.len(), "estimator labels"));
        }

        debug!(
            "Running {} bootstrap replicates with {:?} resampling",
            self.config.replications, self.config.stream
        );

        let (replicates, redraws) = match self.config.stream {
            ResampleStream::Shared => self.run_shared(dataset, estimator, dimension)?,
            ResampleStream::PerReplicate => self.run_per_replicate(dataset, estimator, dimension)?,
        };

        if redraws > 0 {
            warn!(redraws, "Bootstrap redrew resamples after estimator failures");
        }
        debug!("Bootstrap completed");

        Ok(BootstrapDistribution::from_run(
            replicates,
            labels,
            self.config.seed,
            redraws,
        ))
    }

    /// Row indices of every replicate, as the run would draw them when
    /// no replicate fails
    pub fn replicate_indices(&self, n: usize) -> Result<Vec<Vec<usize>>> {
        if n == 0 {
            return Err(Error::empty_input("bootstrap"));
        }
        self.config.validate()?;

        let indices = match self.config.stream {
            ResampleStream::Shared => {
                let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
                (0..self.config.replications)
                    .map(|_| draw_indices(&mut rng, n))
                    .collect()
            }
            ResampleStream::PerReplicate => (0..self.config.replications)
                .map(|i| draw_indices(&mut replicate_rng(self.config.seed, i), n))
                .collect(),
        };
        Ok(indices)
    }

    fn run_shared<E>(
        &self,
        dataset: &Dataset,
        estimator: &E,
        dimension: usize,
    ) -> Result<(Vec<EstimateVector>, usize)>
    where
        E: Estimator + ?Sized,
    {
        let budget = self.config.failure_policy.redraw_budget();
        let n = dataset.n_rows();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut replicates = Vec::with_capacity(self.config.replications);
        let mut redraws = 0;

        for i in 0..self.config.replications {
            loop {
                let indices = draw_indices(&mut rng, n);
                match evaluate(dataset, estimator, &indices, dimension, i) {
                    Ok(estimate) => {
                        replicates.push(estimate);
                        break;
                    }
                    Err(e) if redraws < budget => {
                        redraws += 1;
                        warn!(replicate = i, redraws, error = %e, "Redrawing failed resample");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok((replicates, redraws))
    }

    fn run_per_replicate<E>(
        &self,
        dataset: &Dataset,
        estimator: &E,
        dimension: usize,
    ) -> Result<(Vec<EstimateVector>, usize)>
    where
        E: Estimator + ?Sized,
    {
        let budget = self.config.failure_policy.redraw_budget();
        let seed = self.config.seed;
        let replications = self.config.replications;
        let compute = |i: usize| stream_replicate(dataset, estimator, dimension, seed, i, budget);

        #[cfg(feature = "parallel")]
        if self.config.execution == ExecutionStrategy::Parallel {
            use rayon::prelude::*;
            debug!("Computing replicates on the rayon pool");
            let outcomes: Vec<StreamOutcome> = (0..replications).into_par_iter().map(compute).collect();
            return collect_outcomes(outcomes, budget);
        }

        #[cfg(not(feature = "parallel"))]
        if self.config.execution == ExecutionStrategy::Parallel {
            debug!("Parallel feature disabled, computing replicates sequentially");
        }

        collect_outcomes((0..replications).map(compute), budget)
    }
}

fn draw_indices(rng: &mut ChaCha8Rng, n: usize) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

/// Generator for sub-stream `replicate` of `seed`
fn replicate_rng(seed: u64, replicate: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(replicate as u64);
    rng
}

fn evaluate<E>(
    dataset: &Dataset,
    estimator: &E,
    indices: &[usize],
    dimension: usize,
    replicate: usize,
) -> Result<EstimateVector>
where
    E: Estimator + ?Sized,
{
    let sample = dataset.select_rows(indices);
    let estimate = estimator
        .estimate(&sample)
        .map_err(|e| Error::estimator_failure(replicate, &e))?;
    if estimate.len() != dimension {
        return Err(Error::EstimatorFailure {
            replicate,
            message: format!(
                "expected an estimate of length {dimension}, got {}",
                estimate.len()
            ),
        });
    }
    Ok(estimate)
}

/// Compute replicate `i` from its own sub-stream, redrawing at most
/// `budget` times
fn stream_replicate<E>(
    dataset: &Dataset,
    estimator: &E,
    dimension: usize,
    seed: u64,
    replicate: usize,
    budget: usize,
) -> StreamOutcome
where
    E: Estimator + ?Sized,
{
    let mut rng = replicate_rng(seed, replicate);
    let mut redraws = 0;
    loop {
        let indices = draw_indices(&mut rng, dataset.n_rows());
        match evaluate(dataset, estimator, &indices, dimension, replicate) {
            Ok(estimate) => return Ok((estimate, redraws)),
            Err(e) if redraws < budget => {
                redraws += 1;
                warn!(replicate, redraws, error = %e, "Redrawing failed resample");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Fold per-replicate outcomes in replicate order, enforcing the run-wide
/// redraw budget
fn collect_outcomes<I>(outcomes: I, budget: usize) -> Result<(Vec<EstimateVector>, usize)>
where
    I: IntoIterator<Item = StreamOutcome>,
{
    let mut replicates = Vec::new();
    let mut total = 0;
    for (i, outcome) in outcomes.into_iter().enumerate() {
        let (estimate, redraws) = outcome?;
        total += redraws;
        if total > budget {
            return Err(Error::EstimatorFailure {
                replicate: i,
                message: format!("redraw budget of {budget} exhausted"),
            });
        }
        replicates.push(estimate);
    }
    Ok((replicates, total))
}
