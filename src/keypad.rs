/// the 16-key hex pad; level-triggered, last write wins
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Keypad {
    down: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// only the low nibble of index is used
    pub fn set_key(&mut self, index: u8, down: bool) {
        self.down[(index & 0x0f) as usize] = down;
    }

    pub fn is_down(&self, index: u8) -> bool {
        self.down[(index & 0x0f) as usize]
    }

    /// lowest-numbered key currently held, if any
    pub fn first_down(&self) -> Option<u8> {
        self.down.iter().position(|d| *d).map(|k| k as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_release() {
        let mut k = Keypad::new();
        assert!(!k.is_down(0xa));
        k.set_key(0xa, true);
        assert!(k.is_down(0xa));
        k.set_key(0xa, true);
        k.set_key(0xa, false);
        assert!(!k.is_down(0xa));
    }

    #[test]
    fn test_first_down() {
        let mut k = Keypad::new();
        assert_eq!(k.first_down(), None);
        k.set_key(0xe, true);
        k.set_key(0x3, true);
        assert_eq!(k.first_down(), Some(0x3));
    }

    #[test]
    fn test_index_uses_low_nibble() {
        let mut k = Keypad::new();
        k.set_key(0x15, true);
        assert!(k.is_down(0x5));
        assert!(k.is_down(0xf5));
    }
}
