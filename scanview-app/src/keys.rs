//! Keyboard surface: one global key-down mapping.

use winit::keyboard::{Key, NamedKey};

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Start a capture-and-upload cycle.
    TriggerScan,
    /// Open the file picker and upload an existing image.
    PickFile,
    /// Select the catalog entry at this position.
    SelectModel(usize),
    /// Activate the cut-view control, if visible.
    CutView,
    /// Rotation key, handed to the orientation controller.
    Rotate(char),
}

/// Map a logical key to a command. Letters are case-insensitive; everything
/// unrecognized is ignored.
pub fn map_key(key: &Key) -> Option<Command> {
    match key {
        Key::Named(NamedKey::Escape) => Some(Command::Quit),
        Key::Named(NamedKey::Space) | Key::Named(NamedKey::Enter) => Some(Command::TriggerScan),
        Key::Character(text) => {
            let ch = text.chars().next()?;
            match ch.to_ascii_lowercase() {
                'w' | 's' | 'a' | 'd' => Some(Command::Rotate(ch)),
                'c' => Some(Command::CutView),
                'o' => Some(Command::PickFile),
                digit @ '1'..='9' => Some(Command::SelectModel(digit as usize - '1' as usize)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn test_rotation_keys_pass_through_case() {
        assert_eq!(map_key(&character("w")), Some(Command::Rotate('w')));
        assert_eq!(map_key(&character("W")), Some(Command::Rotate('W')));
        assert_eq!(map_key(&character("d")), Some(Command::Rotate('d')));
    }

    #[test]
    fn test_digits_select_catalog_positions() {
        assert_eq!(map_key(&character("1")), Some(Command::SelectModel(0)));
        assert_eq!(map_key(&character("4")), Some(Command::SelectModel(3)));
    }

    #[test]
    fn test_trigger_and_quit_keys() {
        assert_eq!(map_key(&Key::Named(NamedKey::Space)), Some(Command::TriggerScan));
        assert_eq!(map_key(&Key::Named(NamedKey::Enter)), Some(Command::TriggerScan));
        assert_eq!(map_key(&Key::Named(NamedKey::Escape)), Some(Command::Quit));
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        assert_eq!(map_key(&character("x")), None);
        assert_eq!(map_key(&character("0")), None);
        assert_eq!(map_key(&Key::Named(NamedKey::Tab)), None);
    }
}
