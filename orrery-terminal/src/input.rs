/// Keyboard mapping from crossterm key events to scene input signals
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use orrery_core::{Direction, InputSignal, Plane};

/// Controls line shown in the overlay
pub const CONTROLS: &str = "W/X or Up/Down=Tilt  A/D or Left/Right=Swing  +/-=Zoom  Space=Launch  Q=Quit";

pub fn signal_for(event: &KeyEvent) -> Option<InputSignal> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let signal = match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => InputSignal::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputSignal::Quit,
        KeyCode::Char('w') | KeyCode::Up => InputSignal::Rotate(Plane::YZ, Direction::Positive),
        KeyCode::Char('x') | KeyCode::Down => InputSignal::Rotate(Plane::YZ, Direction::Negative),
        KeyCode::Char('d') | KeyCode::Right => InputSignal::Rotate(Plane::XZ, Direction::Positive),
        KeyCode::Char('a') | KeyCode::Left => InputSignal::Rotate(Plane::XZ, Direction::Negative),
        KeyCode::Char('=') | KeyCode::Char('+') => InputSignal::ZoomIn,
        KeyCode::Char('-') => InputSignal::ZoomOut,
        KeyCode::Char(' ') => InputSignal::LaunchProjectile,
        _ => return None,
    };
    Some(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(signal_for(&press(KeyCode::Char(' '))), Some(InputSignal::LaunchProjectile));
        assert_eq!(
            signal_for(&press(KeyCode::Char('w'))),
            Some(InputSignal::Rotate(Plane::YZ, Direction::Positive))
        );
        assert_eq!(
            signal_for(&press(KeyCode::Left)),
            Some(InputSignal::Rotate(Plane::XZ, Direction::Negative))
        );
        assert_eq!(signal_for(&press(KeyCode::Char('-'))), Some(InputSignal::ZoomOut));
        assert_eq!(signal_for(&press(KeyCode::Char('z'))), None);
        assert_eq!(
            signal_for(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputSignal::Quit)
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let mut event = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(signal_for(&event), None);
    }
}
