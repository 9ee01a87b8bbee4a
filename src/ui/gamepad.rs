/// Gamepad input using gilrs.
///
/// Produces the same `Command`s as the keyboard. Steering comes from the
/// D-pad or the left stick; each fires once when it enters a direction.
/// Meta buttons are configurable in config.toml (`[gamepad]`):
///   confirm  default Start, A
///   pause    default Select
///   quit     default none
///
/// Without the `gamepad` feature this compiles to a pad that never
/// connects and never reports anything.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
use log::{info, warn};

use crate::config::GamepadConfig;
use crate::domain::heading::Heading;
use super::input::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical face / shoulder / meta buttons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Which buttons trigger which meta command.
#[derive(Debug, PartialEq)]
struct ActionMap {
    confirm: Vec<Btn>,
    pause: Vec<Btn>,
    quit: Vec<Btn>,
}

impl ActionMap {
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names
                .iter()
                .filter_map(|s| {
                    let btn = Btn::from_name(s);
                    if btn.is_none() {
                        warn!("gamepad: unknown button name '{}'", s);
                    }
                    btn
                })
                .collect()
        }
        ActionMap {
            confirm: parse_list(&cfg.confirm),
            pause: parse_list(&cfg.pause),
            quit: parse_list(&cfg.quit),
        }
    }

    /// Commands bound to a freshly pressed button, in confirm/pause/quit order.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn commands_for(&self, btn: Btn) -> impl Iterator<Item = Command> + '_ {
        [
            (&self.confirm, Command::Confirm),
            (&self.pause, Command::Pause),
            (&self.quit, Command::Quit),
        ]
        .into_iter()
        .filter(move |(btns, _)| btns.contains(&btn))
        .map(|(_, cmd)| cmd)
    }
}

/// Stick position → heading. Dominant axis wins; inside the deadzone
/// there is none. gilrs reports Y positive upward.
pub fn stick_heading(x: f32, y: f32) -> Option<Heading> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x > 0.0 { Heading::Right } else { Heading::Left })
    } else {
        Some(if y > 0.0 { Heading::Up } else { Heading::Down })
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    action_map: ActionMap,

    // Left stick
    stick_x: f32,
    stick_y: f32,
    /// Direction the stick was last pushed into, so a held stick
    /// steers once instead of every frame.
    stick_dir: Option<Heading>,

    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                warn!("gamepad: gilrs unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        if connected {
            info!("gamepad connected");
        }

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            action_map: ActionMap::from_config(cfg),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            connected,
        }
    }

    /// Drain pad events, appending the resulting commands to `out`.
    pub fn update(&mut self, out: &mut Vec<Command>) {
        #[cfg(feature = "gamepad")]
        self.poll_gilrs(out);
        #[cfg(not(feature = "gamepad"))]
        let _ = out;
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self, out: &mut Vec<Command>) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn, out);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }

        self.stick_edge(out);
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, btn: Button, out: &mut Vec<Command>) {
        let dir = match btn {
            Button::DPadUp => Some(Heading::Up),
            Button::DPadDown => Some(Heading::Down),
            Button::DPadLeft => Some(Heading::Left),
            Button::DPadRight => Some(Heading::Right),
            _ => None,
        };
        if let Some(h) = dir {
            out.push(Command::Steer(h));
            return;
        }
        if let Some(b) = Btn::from_gilrs(btn) {
            out.extend(self.action_map.commands_for(b));
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn stick_edge(&mut self, out: &mut Vec<Command>) {
        let dir = stick_heading(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(h) = dir {
                out.push(Command::Steer(h));
            }
            self.stick_dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(confirm: &[&str], pause: &[&str], quit: &[&str]) -> GamepadConfig {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        GamepadConfig { confirm: owned(confirm), pause: owned(pause), quit: owned(quit) }
    }

    #[test]
    fn button_names_parse_loosely() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name(" Back "), Some(Btn::Select));
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn action_map_skips_unknown_names() {
        let map = ActionMap::from_config(&cfg(&["Start", "Nope"], &["Select"], &[]));
        assert_eq!(map.confirm, vec![Btn::Start]);
        assert_eq!(map.pause, vec![Btn::Select]);
        assert!(map.quit.is_empty());
    }

    #[test]
    fn shared_button_fires_every_bound_command() {
        let map = ActionMap::from_config(&cfg(&["Start"], &["Start"], &["Y"]));
        let cmds: Vec<_> = map.commands_for(Btn::Start).collect();
        assert_eq!(cmds, vec![Command::Confirm, Command::Pause]);
        assert_eq!(map.commands_for(Btn::Y).collect::<Vec<_>>(), vec![Command::Quit]);
        assert_eq!(map.commands_for(Btn::B).count(), 0);
    }

    #[test]
    fn stick_deadzone_and_axes() {
        assert_eq!(stick_heading(0.1, -0.2), None);
        assert_eq!(stick_heading(0.9, 0.3), Some(Heading::Right));
        assert_eq!(stick_heading(-0.8, 0.0), Some(Heading::Left));
        assert_eq!(stick_heading(0.2, 0.7), Some(Heading::Up));
        assert_eq!(stick_heading(0.0, -1.0), Some(Heading::Down));
    }

    #[test]
    fn held_stick_steers_once() {
        let mut pad = GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            action_map: ActionMap::from_config(&cfg(&["Start"], &["Select"], &[])),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            connected: false,
        };
        let mut out = vec![];
        pad.stick_x = 1.0;
        pad.stick_edge(&mut out);
        pad.stick_edge(&mut out);
        assert_eq!(out, vec![Command::Steer(Heading::Right)]);

        pad.stick_x = 0.0;
        pad.stick_edge(&mut out);
        pad.stick_x = 1.0;
        pad.stick_edge(&mut out);
        assert_eq!(out.len(), 2);
    }
}
