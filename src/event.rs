/// A key as delivered by the input source, already reduced to what the
/// session cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// a single printable character
    Char(char),
    Enter,
    Backspace,
    /// anything else (arrows, function keys, modifiers...)
    Unrecognized,
}

impl Key {
    /// Map a key name ("a", "Enter", "Backspace", "ArrowLeft", ...) to a `Key`.
    ///
    /// Only single-character names and the two control names are understood;
    /// every other name is `Unrecognized`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Unrecognized,
                }
            }
        }
    }
}

/// Commands accepted once a session is complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    /// start over with the same text
    Retry,
    /// drop the text and wait for a new one
    New,
}

impl Command {
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Char('r') => Some(Command::Retry),
            Key::Char('n') => Some(Command::New),
            _ => None,
        }
    }
}

/// Everything that can be applied to a session.
///
/// `StartTimer`, `End` and `Replaced` are only ever produced as follow-ups of
/// other events, but nothing stops a host from dispatching them directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Keystroke(Key),
    StartTimer,
    End,
    Command(Command),
    SetText(String),
    /// the whole session was reinitialised; carries no payload
    Replaced,
}

impl Event {
    /// Short, payload-free label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Keystroke(_) => "keystroke",
            Event::StartTimer => "start-timer",
            Event::End => "end",
            Event::Command(_) => "command",
            Event::SetText(_) => "set-text",
            Event::Replaced => "replaced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name_control_keys() {
        assert_eq!(Key::from_name("Enter"), Key::Enter);
        assert_eq!(Key::from_name("Backspace"), Key::Backspace);
    }

    #[test]
    fn test_key_from_name_single_chars() {
        assert_eq!(Key::from_name("a"), Key::Char('a'));
        assert_eq!(Key::from_name(" "), Key::Char(' '));
        assert_eq!(Key::from_name("é"), Key::Char('é'));
    }

    #[test]
    fn test_key_from_name_unrecognized() {
        assert_eq!(Key::from_name("Shift"), Key::Unrecognized);
        assert_eq!(Key::from_name("ArrowLeft"), Key::Unrecognized);
        assert_eq!(Key::from_name(""), Key::Unrecognized);
    }

    #[test]
    fn test_command_from_key() {
        assert_eq!(Command::from_key(&Key::Char('r')), Some(Command::Retry));
        assert_eq!(Command::from_key(&Key::Char('n')), Some(Command::New));
        assert_eq!(Command::from_key(&Key::Char('x')), None);
        assert_eq!(Command::from_key(&Key::Enter), None);
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::Retry.to_string(), "retry");
        assert_eq!(Command::New.to_string(), "new");
    }

    #[test]
    fn test_event_kind_labels() {
        assert_eq!(Event::Keystroke(Key::Enter).kind(), "keystroke");
        assert_eq!(Event::StartTimer.kind(), "start-timer");
        assert_eq!(Event::End.kind(), "end");
        assert_eq!(Event::Command(Command::New).kind(), "command");
        assert_eq!(Event::SetText(String::new()).kind(), "set-text");
        assert_eq!(Event::Replaced.kind(), "replaced");
    }
}
