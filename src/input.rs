//! Window input reduced to viewer commands
//!
//! The window backend maps its own key and button codes onto these types,
//! so the translation to [`Command`] runs (and is tested) without a display.

use crate::control::Command;
use crate::fractal::FractalVariant;

/// Keys the viewer responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Q,
    R,
    Home,
    Tab,
    Num1,
    Num2,
    Num3,
    S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonKind {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    MouseDown {
        x: i32,
        y: i32,
        button: MouseButtonKind,
    },
}

/// Translate one input event on a `size` x `size` grid into a command.
/// Clicks outside the grid are dropped.
pub fn input_command(event: &InputEvent, size: u32) -> Option<Command> {
    match *event {
        InputEvent::Quit => Some(Command::Quit),
        InputEvent::KeyDown(key) => Some(match key {
            Key::Escape | Key::Q => Command::Quit,
            Key::R | Key::Home => Command::Reset,
            Key::Tab => Command::NextVariant,
            Key::Num1 => Command::Select(FractalVariant::Mandelbrot),
            Key::Num2 => Command::Select(FractalVariant::Tricorn),
            Key::Num3 => Command::Select(FractalVariant::BurningShip),
            Key::S => Command::Export(None),
        }),
        InputEvent::MouseDown { x, y, button } => {
            let px = u32::try_from(x).ok().filter(|&px| px < size)?;
            let py = u32::try_from(y).ok().filter(|&py| py < size)?;
            match button {
                MouseButtonKind::Left => Some(Command::ZoomIn { px, py }),
                MouseButtonKind::Right => Some(Command::ZoomOut { px, py }),
                MouseButtonKind::Middle => Some(Command::Reset),
            }
        },
    }
}
