//! Joystick port 2 stand-in, sampled from the window keyboard.
//! Cursor keys or WASD steer; space, enter or left ctrl is the fire button.

use minifb::{Key, Window};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Joystick {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl Joystick {
    pub fn read(window: &Window) -> Self {
        let any_down = |keys: &[Key]| keys.iter().any(|k| window.is_key_down(*k));
        Self {
            up: any_down(&[Key::Up, Key::W]),
            down: any_down(&[Key::Down, Key::S]),
            left: any_down(&[Key::Left, Key::A]),
            right: any_down(&[Key::Right, Key::D]),
            fire: any_down(&[Key::Space, Key::Enter, Key::LeftCtrl]),
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right || self.fire
    }

    #[cfg(test)]
    pub fn fire_only() -> Self {
        Self {
            fire: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_stick_reports_nothing() {
        assert!(!Joystick::default().any());
        assert!(Joystick::fire_only().any());
    }
}
