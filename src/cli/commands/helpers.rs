//! Shared helper functions for CLI commands.

use console::style;

use crate::analysis::AnalysisReport;

/// Format a count with thousands separators.
pub fn format_count(value: u64) -> String {
    let digits: Vec<char> = value.to_string().chars().rev().collect();
    let mut out = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out.chars().rev().collect()
}

/// Print a console summary of the analysis report.
pub fn print_report_summary(report: &AnalysisReport) {
    let overview = &report.overview;

    println!("\n{}", style("Analysis summary").bold());
    println!("{}", "-".repeat(50));
    println!("  period:          {}", overview.date_range);
    println!("  videos:          {}", format_count(overview.total_videos));
    println!("  total views:     {}", format_count(overview.total_views));
    println!("  avg views:       {:.0}", overview.avg_views);
    println!(
        "  avg engagement:  {:.3}%",
        overview.avg_engagement_rate
    );

    let distribution = &report.sentiment_analysis.distribution;
    let total: u64 = distribution.values().sum();
    if total > 0 {
        println!("\n{}", style("Sentiment distribution").cyan());
        for (label, count) in distribution {
            let pct = *count as f64 / total as f64 * 100.0;
            println!("  {:<10} {:>8} ({:.1}%)", label, format_count(*count), pct);
        }
    }

    let keywords = &report.content_themes.top_keywords;
    if !keywords.is_empty() {
        println!("\n{}", style("Top keywords").cyan());
        for (i, kw) in keywords.iter().take(10).enumerate() {
            println!("  {:>2}. {} ({:.3})", i + 1, kw.keyword, kw.weight);
        }
    }

    let yearly = &report.time_trends.yearly;
    if !yearly.is_empty() {
        println!("\n{}", style("Yearly trend").cyan());
        for (year, trend) in yearly {
            println!(
                "  {}: {} videos, avg views {:.0}",
                year, trend.video_count, trend.avg_views
            );
        }
    }
}
