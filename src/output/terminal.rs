// Colored terminal output for score records.

use colored::Colorize;

use crate::toxicity::traits::ScoreRecord;

/// Scores at or above this are shown in red.
const HIGH_THRESHOLD: f64 = 0.7;
/// Scores at or above this (and below HIGH_THRESHOLD) are shown in yellow.
const MEDIUM_THRESHOLD: f64 = 0.3;

const BAR_WIDTH: usize = 20;

/// Display a score record as a labelled bar chart.
pub fn display_scores(text: &str, model_id: &str, record: &ScoreRecord) {
    println!("\n{}", format!("=== Toxicity ({model_id}) ===").bold());
    println!("  \"{}\"", super::truncate_chars(text, 70).dimmed());
    println!();

    for (label, score) in record.iter() {
        println!(
            "  {:<14} {:>5.3}  {}",
            label,
            score,
            colorize_score(score, &score_bar(score))
        );
    }
    println!();
}

/// Render a score in [0, 1] as a fixed-width bar.
pub fn score_bar(score: f64) -> String {
    let filled = (score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn colorize_score(score: f64, s: &str) -> colored::ColoredString {
    if score >= HIGH_THRESHOLD {
        s.red().bold()
    } else if score >= MEDIUM_THRESHOLD {
        s.yellow()
    } else {
        s.green()
    }
}
