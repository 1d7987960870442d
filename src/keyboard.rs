use std::fmt;

use minifb::Key;

/// Reports which hex keys (0x0-0xF) are down right now.
pub trait KeySource {
    fn pressed_keys(&mut self) -> KeySet;
}

/// The set of pressed hex keys, one bit per key.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySet(u16);

impl KeySet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, key: u8) {
        self.0 |= 1 << (key & 0xF);
    }

    pub fn remove(&mut self, key: u8) {
        self.0 &= !(1 << (key & 0xF));
    }

    /// Only the low nibble of `key` names a key; higher values are never pressed.
    pub fn contains(&self, key: u8) -> bool {
        key <= 0xF && self.0 & (1 << key) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The lowest pressed key code.
    pub fn first(&self) -> Option<u8> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let set = *self;
        (0..16u8).filter(move |k| set.contains(*k))
    }
}

impl FromIterator<u8> for KeySet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|k| format!("{k:X}")))
            .finish()
    }
}

// 1 2 3 C        1 2 3 4
// 4 5 6 D   <-   Q W E R
// 7 8 9 E        A S D F
// A 0 B F        Z X C V
pub fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_is_lowest_key() {
        let keys: KeySet = [0xB, 0x3, 0xF].into_iter().collect();
        assert_eq!(keys.first(), Some(0x3));
        assert_eq!(KeySet::new().first(), None);
    }

    #[test]
    fn contains_ignores_out_of_range_values() {
        let mut keys = KeySet::new();
        keys.insert(0x0);
        assert!(keys.contains(0x0));
        assert!(!keys.contains(0x10));
        keys.remove(0x0);
        assert!(keys.is_empty());
    }

    #[test]
    fn keymap_covers_all_sixteen_keys() {
        #[rustfmt::skip]
        let layout = [
            Key::Key1, Key::Key2, Key::Key3, Key::Key4,
            Key::Q, Key::W, Key::E, Key::R,
            Key::A, Key::S, Key::D, Key::F,
            Key::Z, Key::X, Key::C, Key::V,
        ];
        let keys: KeySet = layout.iter().filter_map(|k| key_to_num(*k)).collect();
        assert_eq!(keys.iter().count(), 16);
        assert_eq!(key_to_num(Key::Escape), None);
    }
}
