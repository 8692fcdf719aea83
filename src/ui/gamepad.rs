/// Gamepad support via gilrs (feature "gamepad").
///
/// D-pad or left stick steers; the buttons listed under `[gamepad] quit`
/// in config.toml (default: Select) end the game. Without the feature the
/// pad never produces input.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::rules::Direction;

/// Stick deflection below this is treated as centred.
const DEADZONE: f32 = 0.25;

/// Canonical name for a config button string, accepting both the Xbox
/// letters and gilrs' compass names.
fn canonical_button(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    let canon = match name.as_str() {
        "a" | "south" => "south",
        "b" | "east" => "east",
        "x" | "west" => "west",
        "y" | "north" => "north",
        "start" => "start",
        "select" | "back" => "select",
        _ => return None,
    };
    Some(canon)
}

#[cfg(feature = "gamepad")]
fn gilrs_button_name(btn: Button) -> Option<&'static str> {
    Some(match btn {
        Button::South => "south",
        Button::East => "east",
        Button::West => "west",
        Button::North => "north",
        Button::Start => "start",
        Button::Select => "select",
        _ => return None,
    })
}

#[cfg(feature = "gamepad")]
fn dpad_direction(btn: Button) -> Option<Direction> {
    match btn {
        Button::DPadUp => Some(Direction::Up),
        Button::DPadDown => Some(Direction::Down),
        Button::DPadLeft => Some(Direction::Left),
        Button::DPadRight => Some(Direction::Right),
        _ => None,
    }
}

/// Held directional controls, independent of the gilrs backend.
#[derive(Clone, Copy, Default, Debug)]
struct Sticks {
    dpad: Direction,
    x: f32,
    y: f32,
}

impl Sticks {
    /// D-pad wins; otherwise the stick's dominant vertical axis, then
    /// horizontal. Positive y is up.
    fn direction(&self) -> Direction {
        if self.dpad != Direction::None {
            self.dpad
        } else if self.y.abs() > DEADZONE {
            if self.y > 0.0 { Direction::Up } else { Direction::Down }
        } else if self.x.abs() > DEADZONE {
            if self.x > 0.0 { Direction::Right } else { Direction::Left }
        } else {
            Direction::None
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    sticks: Sticks,
    pending: Direction,
    quit_names: Vec<&'static str>,
    quit: bool,
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs = Gilrs::new()
            .map_err(|e| log::warn!("gamepad support unavailable: {e}"))
            .ok();
        #[cfg(feature = "gamepad")]
        let connected = gilrs.as_ref().is_some_and(|g| g.gamepads().next().is_some());
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            sticks: Sticks::default(),
            pending: Direction::None,
            quit_names: vec!["select"],
            quit: false,
            connected,
        }
    }

    /// Unknown names are logged and skipped; if nothing usable remains the
    /// default binding stays.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let mut names = Vec::new();
        for raw in &cfg.quit {
            match canonical_button(raw) {
                Some(n) => names.push(n),
                None => log::warn!("config: unknown gamepad button {raw:?}"),
            }
        }
        if !names.is_empty() {
            self.quit_names = names;
        }
    }

    /// Poll the backend and latch the held direction for the next tick.
    pub fn update(&mut self) {
        #[cfg(feature = "gamepad")]
        self.poll();

        let held = self.sticks.direction();
        if held != Direction::None {
            self.pending = held;
        }
    }

    #[cfg(feature = "gamepad")]
    fn poll(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else { return };
        while let Some(ev) = gilrs.next_event() {
            match ev.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    if let Some(dir) = dpad_direction(btn) {
                        self.sticks.dpad = dir;
                        self.pending = dir;
                    } else if let Some(name) = gilrs_button_name(btn) {
                        self.press_named(name);
                    }
                }
                EventType::ButtonReleased(btn, _) => {
                    if dpad_direction(btn) == Some(self.sticks.dpad) {
                        self.sticks.dpad = Direction::None;
                    }
                }
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.sticks.x = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.sticks.y = v,
                EventType::Connected => {
                    self.connected = true;
                    log::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.sticks = Sticks::default();
                    self.pending = Direction::None;
                    log::info!("gamepad disconnected");
                }
                _ => {}
            }
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn press_named(&mut self, name: &str) {
        if self.quit_names.contains(&name) {
            self.quit = true;
        }
    }

    /// This tick's direction; resets to `None` for the next tick.
    pub fn take_direction(&mut self) -> Direction {
        std::mem::take(&mut self.pending)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}
