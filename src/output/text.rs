//! Human-readable text output

use super::RunSummary;
use crate::distribution::DistributionIndex;

/// Longest label printed before truncation
const MAX_LABEL_CHARS: usize = 48;

/// Print the range layout of an index (dry-run mode)
pub fn print_ranges(index: &DistributionIndex) {
    println!("Query distribution (total frequency {}):", index.total_frequency());
    for (i, matcher) in index.matchers().iter().enumerate() {
        println!(
            "  #{:<3} {:<16} {:>2} {} {}",
            i,
            matcher.range().to_string(),
            matcher.queries().len(),
            if matcher.queries().len() == 1 { "query  " } else { "queries" },
            truncate(matcher.label())
        );
    }
}

/// Print the results of a run
pub fn print_summary(summary: &RunSummary) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                    RUN SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("Elapsed Time: {:.3}s", summary.elapsed_secs);
    println!("Samples:      {}", summary.samples);
    println!("Queries:      {}", summary.queries);
    if summary.errors > 0 {
        println!("Errors:       {}", summary.errors);
    }
    println!();

    println!("Selection mix:");
    println!("  {:<4} {:>10} {:>10} {:>10}  {}", "#", "expected", "observed", "hits", "entry");
    for (i, entry) in summary.entries.iter().enumerate() {
        println!(
            "  {:<4} {:>9.2}% {:>9.2}% {:>10}  {}",
            i,
            entry.expected_share,
            entry.observed_share,
            entry.hits,
            truncate(&entry.label)
        );
    }
}

/// Shorten a label to a single printable line
fn truncate(label: &str) -> String {
    let single_line = label.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= MAX_LABEL_CHARS {
        return single_line;
    }
    let mut short: String = single_line.chars().take(MAX_LABEL_CHARS - 3).collect();
    short.push_str("...");
    short
}
