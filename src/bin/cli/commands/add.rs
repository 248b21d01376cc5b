use anyhow::Result;

use recall_lib::flashcards::{Arousal, Importance, NewCard};

use crate::app::{parse_tags, short_id, App};
use crate::OutputFormat;

pub struct AddArgs {
    pub cue: String,
    pub content: Option<String>,
    pub context: Option<String>,
    pub micro_task: Option<String>,
    pub tags: Option<String>,
    pub importance: Importance,
    pub arousal: Option<Arousal>,
}

pub fn run(app: &mut App, args: AddArgs, format: &OutputFormat) -> Result<()> {
    let request = NewCard {
        cue: args.cue,
        content: args.content.unwrap_or_default(),
        context: args.context.unwrap_or_default(),
        micro_task: args.micro_task.unwrap_or_default(),
        tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
        importance: args.importance,
        arousal: args.arousal,
    };

    let card = app.state.add_card(request).clone();
    app.save()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            println!("Added card \"{}\"", card.cue);
            println!("  Domain: {}", card.domain());
            println!("  ID: {}", short_id(&card.id));
        }
    }

    Ok(())
}
