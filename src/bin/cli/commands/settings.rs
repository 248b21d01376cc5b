use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

/// Show settings, or change the ones given
pub fn run(
    app: &mut App,
    daily_cap: Option<i32>,
    domain_cap: Option<i32>,
    format: &OutputFormat,
) -> Result<()> {
    if daily_cap.is_some() || domain_cap.is_some() {
        let mut session = app.session(None);
        // Domain cap first: it is the one that can be rejected
        if let Some(n) = domain_cap {
            session.set_domain_cap(n)?;
        }
        if let Some(n) = daily_cap {
            session.set_daily_cap(n);
        }
    }

    let settings = &app.state.settings;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(settings)?),
        OutputFormat::Plain => {
            println!("Daily cap:  {}", settings.daily_cap);
            println!("Domain cap: {}", settings.domain_cap);
            println!("Data file:  {}", app.store.state_path().display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_lib::config::RecallConfig;
    use recall_lib::flashcards::{Settings, StateStore};
    use tempfile::TempDir;

    fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let app = App::new(RecallConfig::default(), Some(temp_dir.path().to_path_buf())).unwrap();
        (app, temp_dir)
    }

    #[test]
    fn test_settings_are_saved() {
        let (mut app, _temp) = create_test_app();

        run(&mut app, Some(12), Some(2), &OutputFormat::Json).unwrap();

        let expected = Settings {
            daily_cap: 12,
            domain_cap: 2,
        };
        assert_eq!(app.state.settings, expected);
        assert_eq!(app.store.load().settings, expected);
    }

    #[test]
    fn test_rejected_domain_cap_changes_nothing() {
        let (mut app, _temp) = create_test_app();

        assert!(run(&mut app, Some(12), Some(0), &OutputFormat::Plain).is_err());

        assert_eq!(app.state.settings, Settings::default());
        assert!(!app.store.state_path().exists());
    }
}
