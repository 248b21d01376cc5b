use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use recall_lib::flashcards::storage::export_state;

use crate::app::App;

/// File name used when exporting into a directory
fn export_file_name() -> String {
    format!("recall_{}.json", chrono::Local::now().format("%Y-%m-%d"))
}

/// Write the whole state as pretty JSON to `path`, or stdout when omitted
pub fn run_export(app: &App, path: Option<&Path>) -> Result<()> {
    let json = export_state(&app.state).context("Failed to serialize state")?;

    let Some(path) = path else {
        println!("{}", json);
        return Ok(());
    };

    let target: PathBuf = if path.is_dir() {
        path.join(export_file_name())
    } else {
        path.to_path_buf()
    };
    fs::write(&target, json).with_context(|| format!("Failed to write {:?}", target))?;

    println!(
        "Exported {} cards and {} reviews to {}",
        app.state.cards.len(),
        app.state.reviews.len(),
        target.display()
    );
    Ok(())
}

/// Replace the current state with an exported document
pub fn run_import(app: &mut App, path: &Path) -> Result<()> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    app.session(None).import(&json)?;

    println!(
        "Imported {} cards and {} reviews",
        app.state.cards.len(),
        app.state.reviews.len()
    );
    Ok(())
}

/// Delete all cards, reviews and settings
pub fn run_reset(app: &mut App, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("This deletes all cards and reviews. Re-run with --yes to confirm.");
    }

    app.state.reset();
    app.save()?;

    println!("All data cleared.");
    Ok(())
}
