use std::path::Path;

use anyhow::Context;

use crate::math::matrix::ContactMatrix;

/// Load a square contact matrix from CSV. Attempts to parse numeric cells; ignores
/// non-numeric headers and row labels if present. When the header starts with
/// `bracket` (as written by [`write_contact_matrix_csv`]) the first column is a
/// label column and is skipped even where the label is a number.
pub fn load_contact_matrix_csv(path: impl AsRef<Path>) -> anyhow::Result<ContactMatrix> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open contact CSV: {}", path.display()))?;

    let labelled = rdr
        .headers()
        .with_context(|| format!("Bad header in {}", path.display()))?
        .get(0)
        .is_some_and(|h| h.trim() == "bracket");

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("Bad row in {}", path.display()))?;
        let row: Vec<f64> = record
            .iter()
            .skip(usize::from(labelled))
            .filter_map(|field| field.trim().parse::<f64>().ok())
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }
    ContactMatrix::from_rows(rows)
        .with_context(|| format!("contact matrix in {} is unusable", path.display()))
}

/// Write a matrix as CSV: a `bracket,<labels..>` header, then one labelled row
/// per cohort with six decimals. The file reads back with
/// [`load_contact_matrix_csv`] whatever the labels look like.
pub fn write_contact_matrix_csv(
    path: impl AsRef<Path>,
    labels: &[String],
    matrix: &ContactMatrix,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    anyhow::ensure!(
        labels.len() == matrix.dim(),
        "{} labels for a {}x{} matrix",
        labels.len(),
        matrix.dim(),
        matrix.dim()
    );
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("create contact CSV failed (path={:?})", path))?;

    let mut header = vec!["bracket".to_string()];
    header.extend(labels.iter().cloned());
    wtr.write_record(&header)?;
    for (label, row) in labels.iter().zip(matrix.rows()) {
        let mut record = vec![label.clone()];
        record.extend(row.iter().map(|v| format!("{:.6}", v)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
