//! The demo programs. Each one is a self-contained per-frame state machine
//! poking the screen and SID models, in the shape of the machine-language
//! originals: title screen, running phase, and (for the games) a game-over
//! phase that resets static state.

pub mod breakout;
pub mod fire;
pub mod holiday;
pub mod plasma;
pub mod rasterbars;
pub mod scroller;
pub mod snake;
pub mod starfield;
pub mod tetris;

use crate::joystick::Joystick;
use crate::sid::Sid;
use crate::vic::Screen;

/// One program: advance a single PAL frame against the machine surface.
pub trait Demo {
    fn tick(&mut self, input: Joystick, screen: &mut Screen, sid: &mut Sid);
}
