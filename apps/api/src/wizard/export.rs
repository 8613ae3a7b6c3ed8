//! Plain-text export of a recommendation, named with the current date.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::schema::CareerRecommendation;

/// Renders the downloadable report: title, explanation, then the optional
/// bulleted sections. Sections absent from the recommendation are omitted.
pub fn plain_text_report(recommendation: &CareerRecommendation) -> String {
    let mut report = format!(
        "Consulenza di Carriera: {}\n\n{}",
        recommendation.career_title, recommendation.explanation
    );

    if let Some(steps) = recommendation
        .next_steps
        .as_deref()
        .filter(|steps| !steps.is_empty())
    {
        report.push_str("\n\nProssimi Passi Consigliati:");
        for step in steps {
            report.push_str(&format!("\n- {step}"));
        }
    }

    if let Some(careers) = recommendation
        .alternative_careers
        .as_deref()
        .filter(|careers| !careers.is_empty())
    {
        report.push_str("\n\nPercorsi Alternativi da Considerare:");
        for career in careers {
            report.push_str(&format!("\n- {}: {}", career.title, career.description));
        }
    }

    report
}

/// `consulenza-carriera-YYYY-MM-DD.txt`
pub fn report_filename(date: NaiveDate) -> String {
    format!("consulenza-carriera-{}.txt", date.format("%Y-%m-%d"))
}

/// Writes the report into `dir` and returns the file path.
pub fn write_report(
    dir: &Path,
    recommendation: &CareerRecommendation,
    date: NaiveDate,
) -> io::Result<PathBuf> {
    let path = dir.join(report_filename(date));
    std::fs::write(&path, plain_text_report(recommendation))?;
    Ok(path)
}
