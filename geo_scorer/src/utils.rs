use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::GeoAnalysis;

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(data)?.as_bytes())?;
    info!("{} written", path.display());
    Ok(())
}

/// Plain-text report for terminal output.
pub fn render_summary(url: &str, analysis: &GeoAnalysis) -> String {
    let mut out = format!(
        "GEO Score: {}/100 ({})\nAnalysis of: {}\n\nDiagnostic\n{}\n\n{} Priority Recommendations\n",
        analysis.score(),
        analysis.tier().label(),
        url,
        analysis.diagnostic(),
        analysis.improvements().len()
    );
    for (i, improvement) in analysis.improvements().iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. [{}/10] {}\n",
            i + 1,
            improvement.score,
            improvement.text
        ));
    }
    out
}
