//! Basic pattern mining example
//!
//! This example demonstrates how to:
//! 1. Generate background spike trains and inject a repeated pattern
//! 2. Mine closed patterns with both engines
//! 3. Inspect the pattern spectrum and stability of the result

use rand::{rngs::StdRng, SeedableRng};
use spade_mining::{
    data::{BinnedSpikeTrains, PoissonGenerator, SpikeTrain},
    mining::{ConceptMiner, EngineKind, ReportMode, SpectrumKind},
    stability::StabilityEstimator,
};

fn main() -> anyhow::Result<()> {
    println!("=== SPADE - Basic Mining Example ===\n");

    // Step 1: Background activity plus a 3-spike motif
    println!("Step 1: Generating spike trains...");
    let trains = create_data(12, 7)?;
    let total: usize = trains.iter().map(|t| t.len()).sum();
    println!("  {} trains, {} spikes", trains.len(), total);

    let binned = BinnedSpikeTrains::new(&trains, 5.0)?;
    println!(
        "  {} bins of {} ms, {} occupied",
        binned.num_bins(),
        binned.bin_size(),
        binned.num_events()
    );

    // Step 2: Mine with both engines
    println!("\nStep 2: Mining closed patterns...");
    let miner = ConceptMiner::new(4).min_spikes(3).min_occ(4).min_neu(2);
    let run = miner.mine(binned.matrix(), ReportMode::All)?;
    println!(
        "  closed itemsets: {} concepts in {:?}",
        run.output.concepts().len(),
        run.stats.total()
    );

    let fca = miner
        .clone()
        .engine(EngineKind::FormalConcepts)
        .mine(binned.matrix(), ReportMode::All)?;
    println!(
        "  formal concepts: {} concepts in {:?}",
        fca.output.concepts().len(),
        fca.stats.total()
    );

    for concept in run.output.concepts().iter().take(5) {
        println!(
            "    intent {:?} streams {:?} support {}",
            concept.intent,
            concept.streams(4),
            concept.support()
        );
    }

    // Step 3: Spectrum and stability
    println!("\nStep 3: Pattern spectrum and stability...");
    let spectrum = miner.mine(binned.matrix(), ReportMode::Spectrum(SpectrumKind::ThreeD))?;
    if let Some(spectrum) = spectrum.output.spectrum() {
        for (signature, count) in spectrum.iter() {
            println!("    {} -> {}", signature, count);
        }
    }

    let annotated = StabilityEstimator::new(200)
        .seed(1)
        .estimate(run.output.concepts(), run.context.relation())?;
    for c in annotated.iter().take(5) {
        if let Some(s) = c.stability {
            println!(
                "    intent {:?}: intensional {:.2}, extensional {:.2}",
                c.concept.intent, s.intensional, s.extensional
            );
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}

/// Poisson trains with streams 0, 1, 2 firing at lags 0, 5, 10 ms
fn create_data(n: usize, occurrences: usize) -> anyhow::Result<Vec<SpikeTrain>> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut trains = PoissonGenerator::new(8.0, 0.0, 2000.0)?.generate_many(n, &mut rng);

    for k in 0..occurrences {
        let t0 = 100.0 + 250.0 * k as f64 + 1.0;
        for (stream, lag) in [(0usize, 0.0), (1, 5.0), (2, 10.0)] {
            let train = &trains[stream];
            let mut times = train.times.clone();
            times.push(t0 + lag);
            trains[stream] = SpikeTrain::new(times, train.t_start, train.t_stop)?;
        }
    }
    Ok(trains)
}
