use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use flap_core::{Evaluator, FinishReason, GenerationReport, NullRenderer, SimConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;

use crate::frames::JsonLinesRenderer;
use crate::policy::LinearPolicy;

/// How far offspring parameters may stray from the best policy.
const MUTATION_STRENGTH: f64 = 0.25;

pub struct RunOptions {
    pub population: usize,
    pub generations: u32,
    pub seed: u64,
    pub max_ticks: u64,
    pub frames: Option<PathBuf>,
    pub json: bool,
}

/// One row of the run summary.
#[derive(Debug, Serialize)]
struct GenerationSummary {
    generation: u32,
    best: f64,
    mean: f64,
    score: u32,
    ticks: u64,
    survivors: usize,
    reason: FinishReason,
}

impl GenerationSummary {
    fn new(generation: u32, report: &GenerationReport) -> Self {
        let best = report.best().map_or(0.0, |(_, f)| f);
        let mean = if report.fitness.is_empty() {
            0.0
        } else {
            report.fitness.iter().sum::<f64>() / report.fitness.len() as f64
        };
        Self {
            generation,
            best,
            mean,
            score: report.score,
            ticks: report.ticks,
            survivors: report.survivors,
            reason: report.reason,
        }
    }
}

pub fn run(opts: &RunOptions) -> Result<(), String> {
    if opts.population == 0 {
        return Err("population is empty".into());
    }
    if opts.generations == 0 {
        return Err("at least one generation is required".into());
    }
    let config = super::base_config(Some(opts.seed)).with_max_ticks(opts.max_ticks);
    config.validate().map_err(|e| e.to_string())?;

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut policies: Vec<LinearPolicy> = (0..opts.population)
        .map(|_| LinearPolicy::random(&mut rng, config.screen_height))
        .collect();

    let mut summaries = Vec::new();
    let mut frames_written = None;
    for generation in 0..opts.generations {
        let last = generation + 1 == opts.generations;
        let report = {
            let mut evaluator =
                Evaluator::new(&mut policies, config.clone()).map_err(|e| e.to_string())?;
            match opts.frames.as_deref() {
                Some(path) if last => {
                    debug!(path = %path.display(), "recording frames");
                    let mut writer = JsonLinesRenderer::create(path)?;
                    let report = evaluator.run(&mut writer);
                    frames_written = Some(writer.finish()?);
                    report
                }
                _ => evaluator.run(&mut NullRenderer),
            }
        };
        summaries.push(GenerationSummary::new(generation, &report));
        if !last {
            policies = next_generation(&policies, &report, &mut rng);
        }
    }

    if opts.json {
        let json = serde_json::to_string_pretty(&summaries)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    print_summary(opts, &config, &summaries);
    if let (Some(path), Some(count)) = (&opts.frames, frames_written) {
        println!("  Wrote {count} frames to {}", path.display());
    }
    Ok(())
}

/// Keep the fittest policy and fill the rest with its mutated offspring.
fn next_generation(
    policies: &[LinearPolicy],
    report: &GenerationReport,
    rng: &mut StdRng,
) -> Vec<LinearPolicy> {
    let Some((best, _)) = report.best() else {
        return Vec::new();
    };
    let parent = &policies[best];
    debug!(best, fitness = parent.fitness(), "selected parent");
    std::iter::once(parent.fresh())
        .chain((1..policies.len()).map(|_| parent.mutated(rng, MUTATION_STRENGTH)))
        .collect()
}

fn print_summary(opts: &RunOptions, config: &SimConfig, summaries: &[GenerationSummary]) {
    println!(
        "  {} {}",
        "Run".bold(),
        format!(
            "({} agents, {} generations, seed={}, max {} ticks)",
            opts.population, opts.generations, config.seed, opts.max_ticks
        )
        .dimmed()
    );
    println!();
    println!("  {}", "Generations".bold().underline());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Generation",
        "Best",
        "Mean",
        "Score",
        "Ticks",
        "Survivors",
        "Finish",
    ]);
    for s in summaries {
        table.add_row(vec![
            s.generation.to_string(),
            format!("{:.2}", s.best),
            format!("{:.2}", s.mean),
            s.score.to_string(),
            s.ticks.to_string(),
            s.survivors.to_string(),
            finish_label(s.reason),
        ]);
    }
    println!("{table}");
    println!();

    if let Some(top) = summaries
        .iter()
        .max_by(|a, b| a.best.total_cmp(&b.best))
    {
        println!(
            "  {} {:.2} in generation {} ({} pipes)",
            "Best fitness".green().bold(),
            top.best,
            top.generation,
            top.score
        );
    }
}

fn finish_label(reason: FinishReason) -> String {
    match reason {
        FinishReason::PopulationExhausted => "exhausted".red().to_string(),
        FinishReason::TickCap => "tick cap".yellow().to_string(),
        FinishReason::Aborted => "aborted".dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(fitness: Vec<f64>) -> GenerationReport {
        GenerationReport {
            removed_at: vec![None; fitness.len()],
            fitness,
            score: 2,
            ticks: 120,
            survivors: 0,
            reason: FinishReason::PopulationExhausted,
        }
    }

    #[test]
    fn summary_takes_best_and_mean() {
        let summary = GenerationSummary::new(3, &report(vec![1.0, 4.0, 1.0]));
        assert_eq!(summary.generation, 3);
        assert!((summary.best - 4.0).abs() < 1e-12);
        assert!((summary.mean - 2.0).abs() < 1e-12);
        assert_eq!(summary.score, 2);
    }

    #[test]
    fn next_generation_keeps_the_parent_first() {
        let mut rng = StdRng::seed_from_u64(1);
        let policies: Vec<_> = (0..4)
            .map(|_| LinearPolicy::random(&mut rng, 800.0))
            .collect();
        let next = next_generation(&policies, &report(vec![0.5, 0.1, 2.0, 1.0]), &mut rng);
        assert_eq!(next.len(), 4);
        assert_eq!(next[0], policies[2].fresh());
        assert!(next[1..].iter().all(|p| *p != policies[2].fresh()));
    }
}
