//! `readiness`: score buildings from a notes file.
//!
//! Usage: `readiness <notes.json> [--metrics]`
//!
//! `notes.json` maps building ids to their note texts:
//! `{ "12": ["paved lot behind the warehouse", null], "13": [] }`
//!
//! Warms the configured score store best-effort, then prints one JSON line per
//! building (authoritative lookups) and a summary line.

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use site_readiness::config::Settings;
use site_readiness::summary::{rank_by_score, summarize};
use site_readiness::metrics as readiness_metrics;
use site_readiness::{telemetry, NoteBook, Observation, ScoreCache};

struct Args {
    notes_path: PathBuf,
    print_metrics: bool,
}

fn parse_args() -> Result<Args> {
    let mut notes_path = None;
    let mut print_metrics = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--metrics" => print_metrics = true,
            "-h" | "--help" => {
                println!("usage: readiness <notes.json> [--metrics]");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown flag: {other}"),
            other => notes_path = Some(PathBuf::from(other)),
        }
    }
    let Some(notes_path) = notes_path else {
        bail!("usage: readiness <notes.json> [--metrics]");
    };
    Ok(Args {
        notes_path,
        print_metrics,
    })
}

fn load_notes(path: &Path) -> Result<NoteBook> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading notes from {}", path.display()))?;
    let parsed: BTreeMap<i64, Vec<Option<String>>> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let book = NoteBook::new();
    for (entity_id, texts) in parsed {
        book.extend(
            entity_id,
            texts
                .iter()
                .map(|t| Observation::new(None, t.as_deref())),
        );
    }
    Ok(book)
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let settings = Settings::load_default()?;
    telemetry::init_tracing(&settings.log_filter, settings.log_format);

    let args = parse_args()?;
    let prom = if args.print_metrics {
        Some(readiness_metrics::install_prometheus().context("installing prometheus recorder")?)
    } else {
        None
    };

    let book = load_notes(&args.notes_path)?;
    let ids = book.entity_ids();

    let cache = ScoreCache::new(settings.open_store()?);
    let report = cache.warm_best_effort(&book, ids.iter().copied());
    tracing::info!(
        hits = report.hits,
        computed = report.computed,
        failed = report.failed,
        "warm-up finished"
    );

    let mut scored = Vec::with_capacity(ids.len());
    for id in ids {
        let result = cache.get_or_compute_building_score(&book, id)?;
        scored.push((id, result));
    }

    for (id, r) in rank_by_score(scored.clone()) {
        println!(
            "{}",
            json!({
                "entity_id": id,
                "score": r.score,
                "confidence": r.confidence,
                "drivers": r.drivers,
            })
        );
    }

    let summary = summarize(scored.iter().map(|(_, r)| r));
    println!("{}", json!({ "summary": summary }));

    if let Some(handle) = prom {
        print!("{}", handle.render());
    }
    Ok(())
}
