//! Single-document inspection commands.

use std::path::Path;

use crate::prelude::{println, *};
use outline_core::{Extraction, ExtractionResult};

pub fn outline(path: &Path) -> Result<()> {
    let result = load(path)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub fn toc(path: &Path) -> Result<()> {
    let result = load(path)?;

    println!("{}", result.title);
    println!();

    let mut table = new_table();
    table.add_row(prettytable::row!["LEVEL", "PAGE", "TEXT"]);
    for heading in &result.outline {
        table.add_row(prettytable::row![
            heading.level,
            heading.page,
            heading.text.trim_end()
        ]);
    }
    table.printstd();

    Ok(())
}

fn load(path: &Path) -> Result<ExtractionResult> {
    let bytes = std::fs::read(path)
        .wrap_err_with(|| f!("cannot read {}", path.display()))?;

    match layout::extract_outline(&bytes) {
        Extraction::Success(result) => Ok(result),
        Extraction::EmptyDocument => Err(eyre!("document has no pages")),
        Extraction::ParseFailure(reason) => {
            Err(eyre!("cannot parse {}: {}", path.display(), reason))
        }
    }
}
