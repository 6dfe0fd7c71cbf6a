/// how often the delay and sound timers count down, regardless of how fast
/// instructions are being executed
pub const TIMER_HZ: u32 = 60;

/// the delay and sound countdown registers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// count both timers down by one, stopping at zero.
    /// returns true on the tick where the sound timer goes from 1 to 0
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        match self.sound {
            0 => false,
            1 => {
                self.sound = 0;
                true
            }
            _ => {
                self.sound -= 1;
                false
            }
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_timers_stay_at_zero() {
        let mut t = Timers::new();
        assert!(!t.tick());
        assert_eq!(t, Timers { delay: 0, sound: 0 });
    }

    #[test]
    fn test_delay_counts_down() {
        let mut t = Timers { delay: 3, sound: 0 };
        t.tick();
        t.tick();
        assert_eq!(t.delay, 1);
        t.tick();
        t.tick();
        assert_eq!(t.delay, 0);
    }

    #[test]
    fn test_sound_fires_once_after_a_second() {
        let mut t = Timers { delay: 0, sound: 60 };
        let fired: Vec<usize> = (1..=TIMER_HZ as usize + 10)
            .filter(|_| t.tick())
            .collect();
        assert_eq!(fired, vec![60]);
        assert_eq!(t.sound, 0);
        assert!(!t.is_sounding());
    }

    #[test]
    fn test_timers_are_independent() {
        let mut t = Timers { delay: 1, sound: 2 };
        assert!(!t.tick());
        assert_eq!(t, Timers { delay: 0, sound: 1 });
        assert!(t.tick());
        assert_eq!(t, Timers { delay: 0, sound: 0 });
    }
}
