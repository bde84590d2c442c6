//! End-to-end conversion: PDF in, CSV (and optionally QIF) out.

use std::path::{Path, PathBuf};

use crate::converters;
use crate::detect;
use crate::errors::{ConvertError, ConvertResult};
use crate::output;
use crate::pdf::{pdfium, Document};

/// Output options shared by the single-file and folder entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Also convert the resulting CSV to QIF.
    pub qif: bool,
    /// Remove the intermediary CSV after QIF conversion.
    pub remove_csv: bool,
}

/// Convert one PDF statement. Returns the paths of the files written.
pub fn convert_pdf(pdf_path: &Path, options: Options) -> ConvertResult<Vec<PathBuf>> {
    let document = pdfium::load_document(pdf_path)?;
    convert_document(&document, pdf_path, options)
}

fn convert_document(
    document: &Document,
    pdf_path: &Path,
    options: Options,
) -> ConvertResult<Vec<PathBuf>> {
    let first_page_text = document
        .pages
        .first()
        .map(|page| page.text())
        .unwrap_or_default();
    let detection = detect::detect(&first_page_text).ok_or(ConvertError::UnknownBank)?;
    log::info!("detected bank: {}", detection.bank.code().to_uppercase());
    log::info!("detected account type: {}", detection.account.to_uppercase());

    let statement = converters::convert(detection.bank, document)?;

    let csv_path = pdf_path.with_extension("csv");
    output::csv::write_statement(&statement, &csv_path)?;
    log::info!("created CSV: {}", csv_path.display());

    if !options.qif {
        return Ok(vec![csv_path]);
    }

    let qif_path = output::qif::csv_to_qif(&csv_path)?;
    log::info!("created QIF: {}", qif_path.display());

    if options.remove_csv {
        std::fs::remove_file(&csv_path)?;
        log::info!("removed CSV: {}", csv_path.display());
        return Ok(vec![qif_path]);
    }
    Ok(vec![csv_path, qif_path])
}

/// Convert every `*.pdf` in `folder`, continuing past per-file failures.
/// Returns the paths of all files written.
pub fn convert_folder(folder: &Path, options: Options) -> ConvertResult<Vec<PathBuf>> {
    let mut pdfs: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();

    if pdfs.is_empty() {
        log::warn!("no PDFs found in {}", folder.display());
        return Ok(Vec::new());
    }

    let mut outputs = Vec::new();
    for pdf in &pdfs {
        log::info!("processing {}", pdf.display());
        match convert_pdf(pdf, options) {
            Ok(mut written) => outputs.append(&mut written),
            Err(err) => log::error!("{}: {err}", pdf.display()),
        }
    }
    Ok(outputs)
}
