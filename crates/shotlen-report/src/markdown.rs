use crate::analysis::{AnalysisReport, DatasetSummary};
use shotlen_stats::Dataset;

const NOT_AVAILABLE: &str = "_not available_";

pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str("# Shot Length Analysis\n\n");
    out.push_str(&format!("generated_at: {}\n\n", report.generated_at));

    out.push_str("## Inputs\n\n");
    for input in &report.inputs {
        if input.available {
            out.push_str(&format!(
                "- {}: `{}` ({} shots)\n",
                input.dataset,
                input.path.display(),
                input.rows
            ));
        } else {
            out.push_str(&format!(
                "- {}: `{}` {NOT_AVAILABLE}\n",
                input.dataset,
                input.path.display()
            ));
        }
    }
    out.push('\n');

    push_dataset(&mut out, "Hand-scraped movies", report.hand_scraped.as_ref());
    if let Some(summary) = &report.hand_scraped {
        out.push_str("| Movie | Shots | Median (s) | Max (s) | P95 (s) |\n");
        out.push_str("|---|---:|---:|---:|---:|\n");
        for movie in &summary.per_movie {
            out.push_str(&format!(
                "| {} | {} | {:.2} | {:.2} | {:.2} |\n",
                movie.title, movie.stats.count, movie.stats.median, movie.stats.max, movie.stats.p95
            ));
        }
        out.push('\n');
    }
    push_dataset(&mut out, "Bulk corpus", report.corpus.as_ref());

    out.push_str("## Editorial pace\n\n");
    for comparison in &report.editorial_pace {
        match &comparison.pace {
            Some(pace) => out.push_str(&format!(
                "- {}: {:.1} cuts/min ({} shots over {:.1} min)\n",
                pace.title, pace.cuts_per_minute, pace.shot_count, pace.minutes
            )),
            None => out.push_str(&format!("- {}: {NOT_AVAILABLE}\n", comparison.query)),
        }
    }
    match report.industry_cuts_per_minute {
        Some(rate) => out.push_str(&format!(
            "- Industry median ({}): {rate:.1} cuts/min\n",
            Dataset::Corpus.as_str()
        )),
        None => out.push_str(&format!("- Industry median: {NOT_AVAILABLE}\n")),
    }
    out.push('\n');

    out.push_str("## Ceiling\n\n");
    match &report.ceiling {
        Some(ceiling) => {
            out.push_str(&format!(
                "Movies whose longest shot stays under {:.0} s: {}\n",
                ceiling.threshold,
                ceiling.strict.len()
            ));
            for movie in &ceiling.strict {
                out.push_str(&format!(
                    "- {} (max {:.1} s, median {:.2} s, {} shots)\n",
                    movie.title, movie.max, movie.median, movie.count
                ));
            }
            out.push_str(&format!(
                "\nMovies with nearly every shot under {:.0} s: {}\n",
                ceiling.threshold,
                ceiling.soft.len()
            ));
            for movie in &ceiling.soft {
                out.push_str(&format!(
                    "- {} ({:.1}% under, max {:.1} s, {} shots)\n",
                    movie.title,
                    movie.fraction_under * 100.0,
                    movie.max,
                    movie.count
                ));
            }
        }
        None => out.push_str(&format!("{NOT_AVAILABLE}\n")),
    }
    if let Some(wasteland) = &report.wasteland {
        out.push_str(&format!(
            "\nShots between {:.0} s and {:.0} s: {:.1}% of the corpus\n",
            wasteland.min_seconds,
            wasteland.max_seconds,
            wasteland.fraction * 100.0
        ));
    }
    out.push('\n');

    out.push_str("## Cost of consistency\n\n");
    if report.coverage.is_empty() {
        out.push_str(&format!("{NOT_AVAILABLE}\n"));
    } else {
        for point in &report.coverage {
            out.push_str(&format!(
                "- {:.0} s of consistent generation covers {:.1}% of real shots\n",
                point.duration, point.percent_covered
            ));
        }
    }
    out.push('\n');

    if !report.blockbusters.is_empty() {
        out.push_str("## Blockbuster medians\n\n");
        for movie in &report.blockbusters {
            out.push_str(&format!(
                "- {}: {:.2} s ({})\n",
                movie.title,
                movie.median,
                movie.dataset.as_str()
            ));
        }
        out.push('\n');
    }

    out.push_str("## Genres\n\n");
    for genre in &report.genres {
        if genre.stats.is_empty() {
            out.push_str(&format!("- {}: {NOT_AVAILABLE}\n", genre.genre));
        } else {
            out.push_str(&format!(
                "- {}: {} movies, median {:.2} s, p95 {:.2} s\n",
                genre.genre, genre.movies, genre.stats.median, genre.stats.p95
            ));
        }
    }
    out.push('\n');

    out.push_str("## Charts\n\n");
    for chart in &report.charts {
        match (&chart.path, &chart.skipped) {
            (Some(path), _) => out.push_str(&format!("- {}\n", path.display())),
            (None, Some(reason)) => out.push_str(&format!(
                "- {}: skipped ({reason})\n",
                chart.kind.file_name()
            )),
            (None, None) => {}
        }
    }
    out
}

fn push_dataset(out: &mut String, heading: &str, summary: Option<&DatasetSummary>) {
    out.push_str(&format!("## {heading}\n\n"));
    let Some(summary) = summary else {
        out.push_str(&format!("{NOT_AVAILABLE}\n\n"));
        return;
    };
    let global = &summary.global;
    out.push_str(&format!(
        "{} shots across {} movies: median {:.2} s, p95 {:.2} s, p99 {:.2} s, std dev {:.2} s\n",
        global.count, summary.movies, global.median, global.p95, global.p99, global.std_dev
    ));
    if summary.cuts_per_minute.movies.is_empty() {
        out.push_str(&format!("Cuts per minute: {NOT_AVAILABLE}\n"));
    } else {
        out.push_str(&format!(
            "Cuts per minute (median of {} movies): {:.1}\n",
            summary.cuts_per_minute.movies.len(),
            summary.cuts_per_minute.median_rate
        ));
    }
    out.push_str(&format!(
        "Shots under {:.0} s: {:.1}%\n\n",
        summary.under_ceiling.threshold,
        summary.under_ceiling.global * 100.0
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::build_report;
    use shotlen_ingest::{ReportConfig, ShotRow};
    use shotlen_stats::{ShotStatistics, StatsConfig};

    #[test]
    fn coverage_lines_quote_exact_marks() {
        let corpus = (0..50).map(|_| ShotRow::new("9_Heat", 4.8)).collect();
        let stats = ShotStatistics::new(Vec::new(), corpus, StatsConfig::default());
        let report = build_report(&stats, &ReportConfig::default(), Vec::new());

        let markdown = render_markdown(&report);
        assert!(markdown.contains("- 5 s of consistent generation covers 100.0% of real shots"));
        assert!(markdown.contains("- 60 s of consistent generation covers 100.0% of real shots"));
        assert_eq!(report.coverage.len(), 4);
    }

    #[test]
    fn missing_corpus_has_no_coverage_lines() {
        let stats = ShotStatistics::new(Vec::new(), Vec::new(), StatsConfig::default());
        let report = build_report(&stats, &ReportConfig::default(), Vec::new());

        let markdown = render_markdown(&report);
        assert!(markdown.contains("## Cost of consistency\n\n_not available_"));
    }
}
