use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

/// map of characters read from the keyboard to what the chip8 might expect
/// where '1' => 0x01 and 'a' => 0x0a
const CHIP8_LITERAL_KEYMAP: [(char, u8); 16] = [
    ('0', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x04),
    ('5', 0x05),
    ('6', 0x06),
    ('7', 0x07),
    ('8', 0x08),
    ('9', 0x09),
    ('a', 0x0a),
    ('b', 0x0b),
    ('c', 0x0c),
    ('d', 0x0d),
    ('e', 0x0e),
    ('f', 0x0f),
];

/// ditto using left-hand side of qwerty keyboard
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// which host keys stand in for the hex pad
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Keymap {
    /// 1234/qwer/asdf/zxcv block, laid out like the COSMAC VIP pad
    #[default]
    Conventional,
    /// 0-9 and a-f map to themselves
    Literal,
}

impl Keymap {
    fn table(&self) -> HashMap<char, u8> {
        match self {
            Keymap::Conventional => HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            Keymap::Literal => HashMap::from(CHIP8_LITERAL_KEYMAP),
        }
    }
}

/// what the host has done to the keypad since it was last asked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(u8),
    KeyUp(u8),
    Quit,
}

/// reads keypresses
pub trait Input {
    /// drain whatever the host has seen since the last poll, without blocking
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error>;
}

/// how long a key counts as held after the terminal last reported it; has to
/// outlast the usual autorepeat delay (250-500ms) or a held key flickers up
/// and down before the repeats arrive. The cost is that a tap reads as held
/// for half a second.
const KEY_HOLD: Duration = Duration::from_millis(500);

/// Terminals only report presses (plus autorepeat), never releases, so a key
/// is held from its last press until KEY_HOLD has passed.
struct KeyLatch {
    keymap: HashMap<char, u8>,
    held: [Option<Instant>; 16],
}

impl KeyLatch {
    fn new(keymap: Keymap) -> Self {
        KeyLatch {
            keymap: keymap.table(),
            held: [None; 16],
        }
    }

    fn press(&mut self, key: char, now: Instant) -> Option<InputEvent> {
        match self.keymap.get(&key.to_ascii_lowercase()) {
            Some(&mapped) => {
                let was_held = self.held[mapped as usize].replace(now).is_some();
                if was_held {
                    None
                } else {
                    Some(InputEvent::KeyDown(mapped))
                }
            }
            None => {
                warn!("can't map {:?} to a COSMAC key", key);
                None
            }
        }
    }

    fn expire(&mut self, now: Instant) -> Vec<InputEvent> {
        let mut released = Vec::new();
        for (key, held) in self.held.iter_mut().enumerate() {
            if let Some(since) = *held {
                if now.duration_since(since) >= KEY_HOLD {
                    *held = None;
                    released.push(InputEvent::KeyUp(key as u8));
                }
            }
        }
        released
    }
}

/// keyboard input from the terminal, using crossterm in raw mode
pub struct TermInput {
    latch: KeyLatch,
}

impl TermInput {
    pub fn new(keymap: Keymap) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        debug!("raw mode on, keymap {:?}", keymap);
        Ok(TermInput {
            latch: KeyLatch::new(keymap),
        })
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error> {
        let mut events = self.latch.expire(Instant::now());
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Esc => events.push(InputEvent::Quit),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        events.push(InputEvent::Quit)
                    }
                    KeyCode::Char(key) => events.extend(self.latch.press(key, Instant::now())),
                    _ => debug!("ignoring key event {:?}", evt),
                },
                Event::Resize(..) => {}
                other => debug!("ignoring event {:?}", other),
            }
        }
        Ok(events)
    }
}

/// dummy Input implementation for testing; each poll hands out the next batch
#[derive(Default)]
pub struct DummyInput {
    batches: VecDeque<Vec<InputEvent>>,
}

impl DummyInput {
    /// holds down `keys` from the first poll onwards
    pub fn new(keys: &[u8]) -> Self {
        let mut input = DummyInput::default();
        if !keys.is_empty() {
            input
                .batches
                .push_back(keys.iter().map(|k| InputEvent::KeyDown(*k)).collect());
        }
        input
    }

    /// queue up another poll's worth of events
    pub fn then(mut self, events: &[InputEvent]) -> Self {
        self.batches.push_back(events.to_vec());
        self
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_layout() {
        let mut l = KeyLatch::new(Keymap::Conventional);
        let now = Instant::now();
        assert_eq!(l.press('x', now), Some(InputEvent::KeyDown(0x0)));
        assert_eq!(l.press('4', now), Some(InputEvent::KeyDown(0xc)));
        assert_eq!(l.press('V', now), Some(InputEvent::KeyDown(0xf)));
        assert_eq!(l.press('p', now), None);
    }

    #[test]
    fn test_literal_layout() {
        let mut l = KeyLatch::new(Keymap::Literal);
        let now = Instant::now();
        assert_eq!(l.press('a', now), Some(InputEvent::KeyDown(0xa)));
        assert_eq!(l.press('4', now), Some(InputEvent::KeyDown(0x4)));
        assert_eq!(l.press('x', now), None);
    }

    #[test]
    fn test_autorepeat_keeps_key_held() {
        let mut l = KeyLatch::new(Keymap::Conventional);
        let t0 = Instant::now();
        assert_eq!(l.press('w', t0), Some(InputEvent::KeyDown(0x5)));
        let t1 = t0 + KEY_HOLD / 2;
        assert_eq!(l.press('w', t1), None);
        assert!(l.expire(t0 + KEY_HOLD).is_empty());
        assert_eq!(l.expire(t1 + KEY_HOLD), vec![InputEvent::KeyUp(0x5)]);
        assert!(l.expire(t1 + KEY_HOLD * 2).is_empty());
    }

    #[test]
    fn test_held_key_survives_autorepeat_delay() {
        let mut l = KeyLatch::new(Keymap::Conventional);
        let t0 = Instant::now();
        assert_eq!(l.press('q', t0), Some(InputEvent::KeyDown(0x4)));
        // first repeat from a terminal with a 400ms delay
        let repeat = t0 + Duration::from_millis(400);
        assert!(l.expire(repeat).is_empty());
        assert_eq!(l.press('q', repeat), None);
    }

    #[test]
    fn test_dummy_input_batches() -> Result<(), io::Error> {
        let mut i = DummyInput::new(&[1, 2]).then(&[InputEvent::KeyUp(1), InputEvent::Quit]);
        assert_eq!(
            i.poll()?,
            vec![InputEvent::KeyDown(1), InputEvent::KeyDown(2)]
        );
        assert_eq!(i.poll()?, vec![InputEvent::KeyUp(1), InputEvent::Quit]);
        assert!(i.poll()?.is_empty());
        Ok(())
    }
}
