//! Command-line comparison of two handwriting samples.
//!
//! Usage: scriptmatch <questioned> <known> [report.json]
//!
//! When `SCRIPTMATCH_API_KEY` is set the model-assisted assessment runs in
//! addition to the classical pipeline; the optional third argument writes
//! the full JSON report.

use scriptmatch::ai::VisionAssessor;
use scriptmatch::image::io::{load_rgb_image, write_json_file};
use scriptmatch::{CompareParams, Comparator};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let (Some(questioned_path), Some(known_path)) = (args.next(), args.next()) else {
        return Err("usage: scriptmatch <questioned> <known> [report.json]".into());
    };
    let report_path = args.next().map(PathBuf::from);

    let questioned = load_rgb_image(questioned_path.as_ref()).map_err(|e| e.to_string())?;
    let known = load_rgb_image(known_path.as_ref()).map_err(|e| e.to_string())?;

    let mut comparator = Comparator::new(CompareParams::default());
    let mut use_ai = false;
    if let Some(assessor) = VisionAssessor::from_env() {
        comparator = comparator.with_assessor(Box::new(assessor));
        use_ai = true;
    }

    let result = comparator
        .compare(&questioned, &known, use_ai)
        .map_err(|e| e.to_string())?;

    println!(
        "composite score: {:.1}/100 ({})",
        result.composite_score,
        result.verdict.label()
    );
    for sub in &result.sub_scores {
        println!("  {:<20} {:>5.1}  {}", sub.name, sub.score, sub.description);
    }
    if let Some(narrative) = &result.ai_narrative {
        println!("\n{narrative}");
    }
    println!("\ncompleted in {:.1} ms", result.latency_ms);

    if let Some(path) = report_path {
        write_json_file(&path, &result).map_err(|e| e.to_string())?;
        println!("report written to {}", path.display());
    }
    Ok(())
}
