//! Surrogate significance example
//!
//! This example demonstrates how to:
//! 1. Sample the null distribution of maximum supports from dithered data
//! 2. Correct the p-value spectrum for multiple testing
//! 3. Run the full analysis with pattern set reduction

use rand::{rngs::StdRng, SeedableRng};
use spade_mining::{
    analysis::{OutputFormat, PatternsOutput, Spade},
    data::{PoissonGenerator, SpikeTrain, UniformDither},
    reduction::ReductionParams,
    significance::{test_signature_significance, Correction, NullModelSampler},
    utils::{setup_logging, SpadeConfig},
};

fn main() -> anyhow::Result<()> {
    setup_logging("info")?;
    println!("=== SPADE - Surrogate Significance Example ===\n");

    let trains = create_data()?;
    let mut config = SpadeConfig::default();
    config.mining.bin_size = 5.0;
    config.mining.win_len = 3;
    config.mining.min_spikes = 3;
    config.surrogates.n_surr = 100;
    config.surrogates.dither = 15.0;
    config.significance.alpha = 0.05;

    // Step 1: Null distribution
    println!("Step 1: Sampling {} surrogates...", config.surrogates.n_surr);
    let spade = Spade::new(config.clone());
    let sampler = NullModelSampler::new(
        spade.miner(),
        UniformDither::new(config.surrogates.dither)?,
        config.mining.bin_size,
    )
    .n_surr(config.surrogates.n_surr)
    .seed(config.seed);
    let (distribution, stats) = sampler.sample(&trains)?;
    println!(
        "  {} draws, mean run {:?}",
        distribution.num_draws(),
        stats.mean_per_run()
    );
    let pvalues = distribution.pvalue_spectrum();

    // Step 2: Corrections
    println!("\nStep 2: Testing {} signatures...", pvalues.len());
    for correction in [
        Correction::None,
        Correction::Bonferroni,
        Correction::HolmBonferroni,
        Correction::Fdr,
    ] {
        let test = test_signature_significance(&pvalues, config.significance.alpha, correction)?;
        println!(
            "  {:>9}: {} significant, {} not",
            correction.to_string(),
            test.significant().len(),
            test.non_significant().len()
        );
    }

    // Step 3: Full analysis
    println!("\nStep 3: Full analysis with pattern set reduction...");
    config.reduction = Some(ReductionParams::default());
    config.output_format = OutputFormat::Patterns;
    let output = Spade::new(config).run(&trains)?;

    if let PatternsOutput::Patterns(patterns) = &output.patterns {
        for p in patterns {
            println!(
                "  neurons {:?} lags {:?} occurrences {} p-value {:.3}",
                p.neurons,
                p.lags,
                p.times.len(),
                p.pvalue
            );
        }
        if patterns.is_empty() {
            println!("  no significant patterns");
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}

/// 20 background trains; streams 3, 7 and 11 repeat a pattern 10 times
fn create_data() -> anyhow::Result<Vec<SpikeTrain>> {
    let mut rng = StdRng::seed_from_u64(3);
    let mut trains = PoissonGenerator::new(10.0, 0.0, 3000.0)?.generate_many(20, &mut rng);

    for k in 0..10 {
        let t0 = 150.0 + 280.0 * k as f64 + 1.0;
        for (stream, lag) in [(3usize, 0.0), (7, 5.0), (11, 10.0)] {
            let train = &trains[stream];
            let mut times = train.times.clone();
            times.push(t0 + lag);
            trains[stream] = SpikeTrain::new(times, train.t_start, train.t_stop)?;
        }
    }
    Ok(trains)
}
