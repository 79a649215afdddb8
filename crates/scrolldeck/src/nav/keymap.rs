/// Normalized key press delivered by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
    Enter,
    Escape,
    Char(char),
}

/// Deck-level action bound to a key, applied once the panels have had
/// their chance at the press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Next,
    Previous,
    First,
    Last,
    ToggleOverview,
    ToggleNotes,
    TogglePresent,
}

/// Flat key-to-command map. `None` means the press is not ours and the
/// host keeps its default handling. Letter bindings are case
/// insensitive.
pub fn command_for(key: Key) -> Option<KeyCommand> {
    match key {
        Key::ArrowDown | Key::PageDown | Key::Space | Key::Enter => Some(KeyCommand::Next),
        Key::ArrowUp | Key::PageUp => Some(KeyCommand::Previous),
        Key::Home => Some(KeyCommand::First),
        Key::End => Some(KeyCommand::Last),
        Key::Char('o') | Key::Char('O') => Some(KeyCommand::ToggleOverview),
        Key::Char('n') | Key::Char('N') => Some(KeyCommand::ToggleNotes),
        Key::Char('p') | Key::Char('P') => Some(KeyCommand::TogglePresent),
        Key::Escape | Key::Char(_) => None,
    }
}
