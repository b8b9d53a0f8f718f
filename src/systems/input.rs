use log::debug;
use tcod::input::{self, Key, KeyCode};

/// What can activate an action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    Key(KeyCode),
    /// A printable key, whatever the key code reported for it.
    Char(char),
    /// The window close button.
    Close,
}

impl Control {
    fn matches(self, key: &Key) -> bool {
        match self {
            Control::Key(code) => key.code == code,
            Control::Char(c) => {
                matches!(key.code, KeyCode::Char | KeyCode::Text) && key.printable.eq_ignore_ascii_case(&c)
            }
            Control::Close => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    name: &'static str,
    controls: Vec<Control>,
    continuous: bool,
    active: bool,
}

impl Action {
    pub fn new(name: &'static str) -> Self {
        Action {
            name,
            controls: Vec::new(),
            continuous: false,
            active: false,
        }
    }

    pub fn with(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn continuous(mut self) -> Self {
        self.continuous = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// A press activates the action. A release only deactivates continuous
    /// actions, instantaneous ones wait for `reset`.
    pub fn update(&mut self, key: &Key) {
        if !self.controls.iter().any(|control| control.matches(key)) {
            return;
        }
        if key.pressed {
            self.active = true;
        } else if self.continuous {
            self.active = false;
        }
    }

    pub fn on_close(&mut self) {
        if self.controls.contains(&Control::Close) {
            self.active = true;
        }
    }

    pub fn reset(&mut self) {
        if !self.continuous {
            self.active = false;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameActions {
    pub up: Action,
    pub down: Action,
    pub left: Action,
    pub right: Action,
    pub use_: Action,
    pub close: Action,
    pub fullscreen: Action,
}

impl Default for GameActions {
    fn default() -> Self {
        GameActions {
            up: Action::new("Up").with(Control::Key(KeyCode::Up)).continuous(),
            down: Action::new("Down").with(Control::Key(KeyCode::Down)).continuous(),
            left: Action::new("Left").with(Control::Key(KeyCode::Left)).continuous(),
            right: Action::new("Right").with(Control::Key(KeyCode::Right)).continuous(),
            use_: Action::new("Use")
                .with(Control::Key(KeyCode::Enter))
                .with(Control::Key(KeyCode::NumPadEnter))
                .with(Control::Key(KeyCode::Spacebar)),
            close: Action::new("Close")
                .with(Control::Key(KeyCode::Escape))
                .with(Control::Close),
            fullscreen: Action::new("Fullscreen").with(Control::Char('f')),
        }
    }
}

impl GameActions {
    fn all_mut(&mut self) -> [&mut Action; 7] {
        [
            &mut self.up,
            &mut self.down,
            &mut self.left,
            &mut self.right,
            &mut self.use_,
            &mut self.close,
            &mut self.fullscreen,
        ]
    }

    pub fn update(&mut self, key: &Key) {
        for action in self.all_mut().iter_mut() {
            action.update(key);
        }
    }

    pub fn on_close(&mut self) {
        for action in self.all_mut().iter_mut() {
            action.on_close();
        }
    }

    /// Arrows are held while walking and pressed once in menus.
    pub fn set_arrows_continuous(&mut self, continuous: bool) {
        for action in &mut [&mut self.up, &mut self.down, &mut self.left, &mut self.right] {
            if action.is_continuous() != continuous {
                action.set_continuous(continuous);
                action.active = false;
            }
        }
    }

    /// Drains the pending tcod key events. `window_closed` comes from the
    /// root console.
    pub fn poll(&mut self, window_closed: bool) {
        while let Some((_, event)) = input::check_for_event(input::KEY_PRESS | input::KEY_RELEASE) {
            if let input::Event::Key(key) = event {
                debug!(target: "general", "Key: {:?} (pressed: {})", key.code, key.pressed);
                self.update(&key);
            }
        }
        if window_closed {
            self.on_close();
        }
    }

    pub fn reset(&mut self) {
        for action in self.all_mut().iter_mut() {
            action.reset();
        }
    }
}
