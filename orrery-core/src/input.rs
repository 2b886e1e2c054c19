/// Input signals, abstracted away from raw key codes
use crate::camera::{Direction, Plane};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    Rotate(Plane, Direction),
    ZoomIn,
    ZoomOut,
    LaunchProjectile,
    Quit,
}

impl InputSignal {
    pub const ALL: [InputSignal; 8] = [
        InputSignal::Rotate(Plane::YZ, Direction::Positive),
        InputSignal::Rotate(Plane::YZ, Direction::Negative),
        InputSignal::Rotate(Plane::XZ, Direction::Positive),
        InputSignal::Rotate(Plane::XZ, Direction::Negative),
        InputSignal::ZoomIn,
        InputSignal::ZoomOut,
        InputSignal::LaunchProjectile,
        InputSignal::Quit,
    ];

    /// Bit position of this signal in a packed snapshot
    pub fn bit(self) -> u32 {
        let position = Self::ALL
            .iter()
            .position(|&signal| signal == self)
            .unwrap_or_default();
        1 << position
    }
}

/// Signals active during one frame, in the order they arrived
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    signals: Vec<InputSignal>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signal; repeats within one frame are collapsed
    pub fn press(&mut self, signal: InputSignal) {
        if !self.signals.contains(&signal) {
            self.signals.push(signal);
        }
    }

    pub fn is_pressed(&self, signal: InputSignal) -> bool {
        self.signals.contains(&signal)
    }

    pub fn signals(&self) -> &[InputSignal] {
        &self.signals
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn clear(&mut self) {
        self.signals.clear();
    }

    /// Decode a packed snapshot (see [`InputSignal::bit`]); unknown bits are ignored
    pub fn from_bits(bits: u32) -> Self {
        InputSignal::ALL
            .into_iter()
            .filter(|signal| bits & signal.bit() != 0)
            .collect()
    }

    pub fn bits(&self) -> u32 {
        self.signals.iter().fold(0, |bits, signal| bits | signal.bit())
    }
}

impl FromIterator<InputSignal> for InputSnapshot {
    fn from_iter<I: IntoIterator<Item = InputSignal>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for signal in iter {
            snapshot.press(signal);
        }
        snapshot
    }
}
