use beep::beep;
use std::error::Error;
use std::time::{Duration, Instant};

/// Where the interpreter sends its beeps. `beep` is called once each time the
/// sound timer runs out; `update` is called once per frame so a sink can end
/// a tone it started.
pub trait Sound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;

    fn update(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C
const SIMPLEBEEP_LENGTH: Duration = Duration::from_millis(100);

/// a square wave on the PC speaker, via the beep crate
pub struct SimpleBeep {
    started: Option<Instant>,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { started: None }
    }

    fn is_beeping(&self) -> bool {
        self.started.is_some()
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        beep(SIMPLEBEEP_PITCH)?;
        self.started = Some(Instant::now());
        Ok(())
    }

    fn update(&mut self) -> Result<(), Box<dyn Error>> {
        match self.started {
            Some(t) if t.elapsed() >= SIMPLEBEEP_LENGTH => self.stop(),
            _ => Ok(()),
        }
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_beeping() {
            beep(0)?;
            self.started = None;
        }
        Ok(())
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Default for Mute {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}

/// counts beeps rather than making them; for tests
#[derive(Default)]
pub struct DummySound {
    pub beeps: usize,
}

impl Sound for DummySound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        self.beeps += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_is_silent() -> Result<(), Box<dyn Error>> {
        let mut m = Mute::new();
        m.beep()?;
        m.update()?;
        m.stop()
    }

    #[test]
    fn test_dummy_counts() -> Result<(), Box<dyn Error>> {
        let mut d = DummySound::default();
        d.beep()?;
        d.beep()?;
        assert_eq!(d.beeps, 2);
        Ok(())
    }

    #[test]
    fn test_idle_simplebeep_never_touches_speaker() -> Result<(), Box<dyn Error>> {
        let mut s = SimpleBeep::new();
        assert!(!s.is_beeping());
        s.update()?;
        s.stop()?;
        assert!(!s.is_beeping());
        Ok(())
    }

    #[test]
    #[ignore]
    // NB. needs a PC speaker
    fn test_simplebeep() -> Result<(), Box<dyn Error>> {
        let mut s = SimpleBeep::new();
        s.beep()?;
        assert!(s.is_beeping());
        std::thread::sleep(SIMPLEBEEP_LENGTH);
        s.update()?;
        assert!(!s.is_beeping());
        Ok(())
    }
}
