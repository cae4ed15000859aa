use std::collections::HashSet;
use std::path::{Path, PathBuf};

use conjugacy_core::{
    BatchSummary, ConjugacyEngine, DatasetOutcome, FileSink, FileSource, OutputFormat,
    ResultSink, evaluate_all, format_plain,
};

pub struct BatchCommandConfig<'a> {
    pub inputs: &'a [String],
    pub output_dir: Option<&'a str>,
    pub report_path: Option<&'a str>,
    pub workers: usize,
    pub delimiter: &'a str,
    pub tie_break: &'a str,
}

pub fn run(cfg: BatchCommandConfig<'_>) {
    let options = super::parse_options(cfg.delimiter);
    let engine = ConjugacyEngine::new(super::engine_config(cfg.tie_break));

    let sources: Vec<FileSource> = cfg
        .inputs
        .iter()
        .map(|p| FileSource::new(p, options))
        .collect();

    println!("Computing conjugacy for {} file(s)...\n", sources.len());
    let outcomes = evaluate_all(&sources, &engine, cfg.workers);
    print_table(&outcomes);

    let mut write_failures = 0usize;
    if let Some(dir) = cfg.output_dir {
        write_failures = write_results(Path::new(dir), &sources, &outcomes);
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    if let Some(path) = cfg.report_path {
        let report = build_report(&outcomes, &summary);
        match serde_json::to_string_pretty(&report) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => println!("\nReport written to {path}"),
                Err(e) => {
                    eprintln!("Could not save the report: {e}");
                    write_failures += 1;
                }
            },
            Err(e) => {
                eprintln!("Could not serialize the report: {e}");
                write_failures += 1;
            }
        }
    }

    println!(
        "\n{} succeeded, {} failed, {} total",
        summary.succeeded, summary.failed, summary.total
    );
    if summary.failed > 0 || write_failures > 0 {
        std::process::exit(1);
    }
}

fn print_table(outcomes: &[DatasetOutcome]) {
    println!(
        "  {:<32} {:>6} {:>10} {:>8} {:>10}",
        "Dataset", "N", "Delta", "Sigma", "Conjugacy"
    );
    println!("  {}", "─".repeat(70));
    for o in outcomes {
        match &o.result {
            Ok(r) => println!(
                "  {:<32} {:>6} {:>10.2} {:>8.2} {:>10.2}",
                truncate(&o.name, 32),
                r.n,
                r.delta,
                r.sigma,
                r.conjugacy
            ),
            Err(e) => println!("  {:<32} ✗ {e}", truncate(&o.name, 32)),
        }
    }
}

/// Write `<stem>.out` for every successful dataset. Returns the number of
/// files that could not be written.
fn write_results(dir: &Path, sources: &[FileSource], outcomes: &[DatasetOutcome]) -> usize {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Could not create {}: {e}", dir.display());
        return outcomes.iter().filter(|o| o.is_ok()).count();
    }
    let paths = output_paths(dir, sources);
    let mut failures = 0;
    for ((source, outcome), path) in sources.iter().zip(outcomes).zip(paths) {
        let Ok(result) = &outcome.result else {
            continue;
        };
        log::info!("{} -> {}", source.path().display(), path.display());
        if let Err(e) = FileSink::new(path, OutputFormat::Plain).write(result) {
            eprintln!("Could not save the result: {e}");
            failures += 1;
        }
    }
    failures
}

/// One output path per source. Inputs sharing a stem get `-1`, `-2`, ...
/// suffixes in input order so no result overwrites another.
fn output_paths(dir: &Path, sources: &[FileSource]) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    sources
        .iter()
        .map(|source| {
            let stem = source
                .path()
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "result".to_string());
            let mut name = format!("{stem}.out");
            let mut suffix = 1;
            while !taken.insert(name.clone()) {
                name = format!("{stem}-{suffix}.out");
                suffix += 1;
            }
            dir.join(name)
        })
        .collect()
}

fn build_report(outcomes: &[DatasetOutcome], summary: &BatchSummary) -> serde_json::Value {
    let datasets: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(r) => serde_json::json!({
                "name": o.name,
                "success": true,
                "result": r,
                "formatted": format_plain(r),
            }),
            Err(e) => serde_json::json!({
                "name": o.name,
                "success": false,
                "error": e.to_string(),
            }),
        })
        .collect();
    serde_json::json!({
        "version": conjugacy_core::VERSION,
        "summary": summary,
        "datasets": datasets,
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max - 1)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("…{tail}")
    }
}
