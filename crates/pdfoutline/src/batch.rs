//! Directory batch processing: every `*.pdf` in the input directory becomes
//! one `.json` outline in the output directory. A broken document never
//! aborts the run; it produces an error sentinel file instead.

use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;

use crate::prelude::{eprintln, println, *};
use outline_core::Extraction;

#[derive(Debug, clap::Parser)]
#[command(name = "batch")]
#[command(about = "Process every PDF in a directory into JSON outlines")]
pub struct App {
    /// Directory scanned for PDF files (non-recursive)
    #[arg(short, long, default_value = "input")]
    pub input: PathBuf,

    /// Directory receiving one .json file per input PDF
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,
}

/// List the PDF files directly inside `dir`, matched by a case-insensitive
/// `.pdf` extension, in sorted order. Subdirectories are not descended into.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .wrap_err_with(|| f!("cannot read input directory {}", dir.display()))?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path.is_file()
            && path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
        if is_pdf {
            pdfs.push(path);
        }
    }
    pdfs.sort();

    Ok(pdfs)
}

pub fn run(app: App) -> Result<()> {
    std::fs::create_dir_all(&app.input)?;
    std::fs::create_dir_all(&app.output)?;

    let pdfs = discover_pdfs(&app.input)?;
    if pdfs.is_empty() {
        println!("No PDF files found in {}", app.input.display());
        return Ok(());
    }

    let start = Instant::now();

    for path in &pdfs {
        if let Err(e) = process_one(path, &app.output) {
            eprintln!("{}", f!("  {}: {}", path.display(), e).red());
        }
    }

    println!(
        "Processing completed in {:.2} seconds.",
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Process a single document and write its outline JSON.
///
/// Extraction failures degrade to a sentinel result and still produce a
/// file; only filesystem problems bubble up as errors.
fn process_one(path: &Path, output_dir: &Path) -> Result<()> {
    println!("Processing {}...", path.display());

    let bytes = std::fs::read(path)?;
    let extraction = layout::extract_outline(&bytes);

    if let Extraction::ParseFailure(reason) = &extraction {
        eprintln!("{}", f!("  extraction failed: {reason}").red());
    }

    let result = extraction.into_result();

    let stem = path
        .file_stem()
        .ok_or_eyre("input file has no name")?
        .to_string_lossy();
    let out_path = output_dir.join(f!("{stem}.json"));
    std::fs::write(&out_path, serde_json::to_string_pretty(&result)?)?;

    println!("  {} {}", "Saved".green(), out_path.display());
    println!("  Title: {}", result.title);
    println!("  Headings found: {}", result.outline.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_pdfs_case_insensitively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("A.PDF"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found = discover_pdfs(dir.path()).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_pdfs(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn unreadable_pdf_still_writes_sentinel_json() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let input = dir.path().join("broken.pdf");
        std::fs::write(&input, b"not a pdf").unwrap();

        process_one(&input, &out).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("broken.json")).unwrap())
                .unwrap();
        assert_eq!(json["title"], "Error");
        assert_eq!(json["outline"], serde_json::json!([]));
    }
}
