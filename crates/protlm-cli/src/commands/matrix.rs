use crate::cli::MatrixFormat;
use itertools::Itertools;
use protlm_core::{build_substitution_matrix, ScoringSource, SubstitutionMatrix};

pub fn execute(sequence: &str, scoring: &ScoringSource, format: MatrixFormat) -> anyhow::Result<()> {
    let scheme = scoring.resolve();
    let matrix = build_substitution_matrix(sequence, scheme.as_ref());
    tracing::debug!(scheme = scheme.name(), residues = matrix.len(), "built matrix");
    match format {
        MatrixFormat::Json => println!("{}", serde_json::to_string(&matrix)?),
        MatrixFormat::Table => print!("{}", render_table(&matrix)),
    }
    Ok(())
}

/// Residue header row, then one labelled row per residue; cells right-aligned.
pub fn render_table(matrix: &SubstitutionMatrix) -> String {
    if matrix.is_empty() {
        return String::new();
    }
    let width = matrix
        .scores
        .iter()
        .flatten()
        .map(|score| score.to_string().len())
        .max()
        .unwrap_or(1)
        .max(2);
    let header = format!(
        "  {}",
        matrix
            .residues
            .iter()
            .map(|residue| format!("{residue:>width$}"))
            .join(" ")
    );
    let rows = matrix
        .residues
        .iter()
        .zip(&matrix.scores)
        .map(|(residue, row)| {
            format!(
                "{residue} {}",
                row.iter().map(|score| format!("{score:>width$}")).join(" ")
            )
        });
    std::iter::once(header).chain(rows).map(|line| line + "\n").collect()
}
