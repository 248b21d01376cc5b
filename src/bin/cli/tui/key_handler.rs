use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use recall_lib::flashcards::{Arousal, Quality};

use super::app_state::{Mode, TuiState};

pub fn handle_key(state: &mut TuiState<'_>, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    match state.mode {
        Mode::Front | Mode::Back => handle_card_key(state, key),
        Mode::Note => handle_note_key(state, key),
        Mode::Done => handle_done_key(state, key),
    }
}

fn grade_for(c: char) -> Option<Quality> {
    c.to_digit(10)
        .and_then(|d| u8::try_from(d).ok())
        .and_then(|d| Quality::try_from(d).ok())
}

fn handle_card_key(state: &mut TuiState<'_>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char(' ') | KeyCode::Enter => state.reveal(),
        KeyCode::Char(c) if grade_for(c).is_some() => {
            if let Some(quality) = grade_for(c) {
                state.answer(quality);
            }
        }
        KeyCode::Char('l') => state.set_arousal(Arousal::Low),
        KeyCode::Char('m') => state.set_arousal(Arousal::Medium),
        KeyCode::Char('h') => state.set_arousal(Arousal::High),
        KeyCode::Char('n') => state.start_note(),
        KeyCode::Char('r') => state.rebuild_queue(),
        KeyCode::Char('j') | KeyCode::Down => state.content_scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.content_scroll_up(1),
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}

fn handle_note_key(state: &mut TuiState<'_>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.finish_note(false),
        KeyCode::Enter => state.finish_note(true),
        KeyCode::Backspace => {
            state.note.pop();
        }
        KeyCode::Char(c) => {
            state.note.push(c);
        }
        _ => {}
    }
}

fn handle_done_key(state: &mut TuiState<'_>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.quit = true,
        KeyCode::Char('r') => state.rebuild_queue(),
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}

pub fn handle_mouse(state: &mut TuiState<'_>, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // Click on the card reveals it
            if let Some(ref area) = state.card_area {
                if mouse.column >= area.x
                    && mouse.column < area.x + area.width
                    && mouse.row >= area.y
                    && mouse.row < area.y + area.height
                {
                    state.reveal();
                }
            }
        }
        MouseEventKind::ScrollDown => state.content_scroll_down(3),
        MouseEventKind::ScrollUp => state.content_scroll_up(3),
        _ => {}
    }
}
