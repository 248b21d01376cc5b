use anyhow::{bail, Result};

use recall_lib::flashcards::CardUpdate;

use crate::app::{short_id, App};
use crate::OutputFormat;

pub fn run_edit(app: &mut App, id: &str, update: CardUpdate, format: &OutputFormat) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to change. Pass at least one of --cue, --content, --context, --micro, --tags, --importance");
    }

    let id = app.find_card(id)?.id.clone();
    let card = app.state.update_card(&id, update)?.clone();
    app.save()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("Updated card \"{}\" ({})", card.cue, short_id(&card.id)),
    }

    Ok(())
}

pub fn run_remove(app: &mut App, id: &str) -> Result<()> {
    let id = app.find_card(id)?.id.clone();
    let card = app.state.delete_card(&id)?;
    app.save()?;

    println!("Removed card \"{}\" ({})", card.cue, short_id(&card.id));
    Ok(())
}
