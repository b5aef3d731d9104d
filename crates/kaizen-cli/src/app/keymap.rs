//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::focus::{Focus, FocusTarget};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    ToggleHelp,
    Focus(FocusTarget),
    TogglePanel,
    TogglePause,
    CancelDownload,
    Submit,
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Insert(char),
    DeleteBack,
}

/// Map a key press to an action for the current focus.
///
/// Focus keys and `?` are global, so they cannot be typed into the search
/// input. Letters only navigate outside the input.
pub fn action_for(key: &KeyEvent, focus: Focus) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('d') => Some(Action::TogglePanel),
            KeyCode::Char('p') => Some(Action::TogglePause),
            KeyCode::Char('x') => Some(Action::CancelDownload),
            _ => None,
        };
    }

    let global = match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextTab),
        KeyCode::BackTab => Some(Action::PrevTab),
        KeyCode::Enter => Some(Action::Submit),
        KeyCode::Char('!') => Some(Action::Focus(FocusTarget::Input)),
        KeyCode::Char('@') => Some(Action::Focus(FocusTarget::Table)),
        KeyCode::Char('#') => Some(Action::Focus(FocusTarget::SubList)),
        KeyCode::Char('$') => Some(Action::Focus(FocusTarget::DubList)),
        KeyCode::Char('%') => Some(Action::Focus(FocusTarget::Panel)),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    };
    if global.is_some() {
        return global;
    }

    if focus == Focus::Input {
        return match key.code {
            KeyCode::Char(c) => Some(Action::Insert(c)),
            KeyCode::Backspace => Some(Action::DeleteBack),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::PageUp | KeyCode::Char('b') => Some(Action::PageUp),
        KeyCode::PageDown | KeyCode::Char('f') => Some(Action::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::Top),
        KeyCode::End | KeyCode::Char('G') => Some(Action::Bottom),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn focus_keys_are_global() {
        for focus in [Focus::Input, Focus::Table, Focus::DubList] {
            assert_eq!(
                action_for(&press(KeyCode::Char('@')), focus),
                Some(Action::Focus(FocusTarget::Table))
            );
        }
        // Shifted symbols arrive with SHIFT set on most terminals.
        let shifted = KeyEvent::new(KeyCode::Char('#'), KeyModifiers::SHIFT);
        assert_eq!(
            action_for(&shifted, Focus::Input),
            Some(Action::Focus(FocusTarget::SubList))
        );
    }

    #[test]
    fn letters_type_into_input_but_navigate_lists() {
        let j = press(KeyCode::Char('j'));
        assert_eq!(action_for(&j, Focus::Input), Some(Action::Insert('j')));
        assert_eq!(action_for(&j, Focus::SubList), Some(Action::Down));
        assert_eq!(
            action_for(&press(KeyCode::Char('G')), Focus::InfoBox),
            Some(Action::Bottom)
        );
    }

    #[test]
    fn control_chords() {
        assert_eq!(action_for(&ctrl('d'), Focus::Table), Some(Action::TogglePanel));
        assert_eq!(action_for(&ctrl('p'), Focus::Input), Some(Action::TogglePause));
        assert_eq!(
            action_for(&ctrl('x'), Focus::DownloadSubList),
            Some(Action::CancelDownload)
        );
        assert_eq!(action_for(&ctrl('c'), Focus::Input), Some(Action::Quit));
        assert_eq!(action_for(&ctrl('z'), Focus::Input), None);
    }

    #[test]
    fn releases_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(action_for(&release, Focus::Input), None);
    }

    #[test]
    fn tabs_and_escape() {
        assert_eq!(action_for(&press(KeyCode::Tab), Focus::Input), Some(Action::NextTab));
        assert_eq!(
            action_for(&press(KeyCode::BackTab), Focus::Input),
            Some(Action::PrevTab)
        );
        assert_eq!(action_for(&press(KeyCode::Esc), Focus::Table), Some(Action::Quit));
    }
}
