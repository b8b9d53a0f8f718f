use crate::cfg;
use crate::cmtp::UseKind;
use crate::engine::event::{EventStatus, EventType};
use crate::engine::game::{self, GameEvent, Tcod};
use crate::engine::save::SavePointManager;
use crate::systems::hero::{Angular, Linear};
use crate::systems::input::GameActions;
use crate::systems::{dialog, messages, render};
use log::{error, info};
use tcod::console;

/// A vertical list of choices; moving past an end wraps around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuUi {
    current: usize,
    count: usize,
}

impl MenuUi {
    pub fn new(count: usize) -> Self {
        MenuUi { current: 0, count }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn move_up(&mut self) {
        if self.count > 0 {
            self.current = (self.current + self.count - 1) % self.count;
        }
    }

    pub fn move_down(&mut self) {
        if self.count > 0 {
            self.current = (self.current + 1) % self.count;
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

fn slot_choices(saves: &SavePointManager) -> Vec<String> {
    (0..cfg::SLOT_COUNT)
        .map(|slot| saves.slot_info(slot))
        .chain(std::iter::once(String::from("Back")))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartChoice {
    None,
    StartNewGame,
    LoadSlot(usize),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StartMode {
    Main,
    Load,
}

const START_NEW: usize = 0;
const START_LOAD: usize = 1;
const START_QUIT: usize = 2;

/// The title screen: new game, load menu, quit.
#[derive(Debug)]
pub struct StartDriver {
    mode: StartMode,
    main_ui: MenuUi,
    load_ui: MenuUi,
    slots: Vec<String>,
}

impl Default for StartDriver {
    fn default() -> Self {
        StartDriver {
            mode: StartMode::Main,
            main_ui: MenuUi::new(3),
            load_ui: MenuUi::new(cfg::SLOT_COUNT + 1),
            slots: Vec::new(),
        }
    }
}

impl StartDriver {
    fn current_ui(&mut self) -> &mut MenuUi {
        match self.mode {
            StartMode::Main => &mut self.main_ui,
            StartMode::Load => &mut self.load_ui,
        }
    }

    pub fn on_up(&mut self) {
        self.current_ui().move_up();
    }

    pub fn on_down(&mut self) {
        self.current_ui().move_down();
    }

    pub fn on_use(&mut self, saves: &SavePointManager) -> StartChoice {
        match self.mode {
            StartMode::Main => match self.main_ui.current() {
                START_NEW => return StartChoice::StartNewGame,
                START_LOAD => {
                    self.slots = slot_choices(saves);
                    self.load_ui.reset();
                    self.mode = StartMode::Load;
                }
                START_QUIT => return StartChoice::Quit,
                _ => (),
            },
            StartMode::Load => {
                let choice = self.load_ui.current();
                if choice == cfg::SLOT_COUNT {
                    self.mode = StartMode::Main;
                } else if saves.has_slot(choice) {
                    return StartChoice::LoadSlot(choice);
                }
            }
        }
        StartChoice::None
    }

    /// Reads the actions of the frame. Escape leaves the load menu first.
    pub fn update(&mut self, actions: &GameActions, saves: &SavePointManager) -> StartChoice {
        if actions.up.is_active() {
            self.on_up();
        }
        if actions.down.is_active() {
            self.on_down();
        }
        if actions.close.is_active() {
            if self.mode == StartMode::Load {
                self.mode = StartMode::Main;
                return StartChoice::None;
            }
            return StartChoice::Quit;
        }
        if actions.use_.is_active() {
            return self.on_use(saves);
        }
        StartChoice::None
    }

    pub fn render(&self, root: &mut console::Root) {
        match self.mode {
            StartMode::Main => {
                let choices = [
                    String::from("New game"),
                    String::from("Load game"),
                    String::from("Quit"),
                ];
                render::render_menu(root, "EXPT02", &choices, self.main_ui.current(), cfg::MENU_WIDTH);
            }
            StartMode::Load => {
                render::render_menu(root, "Load game", &self.slots, self.load_ui.current(), cfg::MENU_WIDTH);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Walk,
    Talk,
    Save,
}

/// Turns the actions into hero moves, dialog lines and saves.
#[derive(Debug)]
pub struct GameDriver {
    mode: Mode,
    save_ui: MenuUi,
    slots: Vec<String>,
}

impl Default for GameDriver {
    fn default() -> Self {
        GameDriver {
            mode: Mode::Walk,
            save_ui: MenuUi::new(cfg::SLOT_COUNT + 1),
            slots: Vec::new(),
        }
    }
}

impl GameDriver {
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

pub fn register(world: &mut game::World) {
    world.heads_up.add_entity("driver", 20, update, render);
    world.events.register(game::DIALOG_END, on_dialog_end);
}

fn on_dialog_end(world: &mut game::World, _: EventType, _: &mut GameEvent) -> EventStatus {
    if world.driver.mode == Mode::Talk {
        world.driver.mode = Mode::Walk;
    }
    EventStatus::Keep
}

fn enter_save_mode(world: &mut game::World) {
    world.driver.slots = slot_choices(&world.saves);
    world.driver.save_ui.reset();
    world.driver.mode = Mode::Save;
}

pub fn on_use(world: &mut game::World) {
    match world.driver.mode {
        Mode::Walk => {
            if world.dialogs.has_next_line() {
                dialog::show_next_line(world);
                return;
            }
            let loc = world.hero.location(&world.physics);
            let event = game::trigger(
                world,
                GameEvent::Use {
                    loc,
                    kind: UseKind::None,
                },
            );
            match event {
                GameEvent::Use {
                    kind: UseKind::Talk,
                    ..
                } => world.driver.mode = Mode::Talk,
                GameEvent::Use {
                    kind: UseKind::Save,
                    ..
                } => enter_save_mode(world),
                _ => (),
            }
        }
        Mode::Talk => {
            if world.dialogs.has_next_line() {
                dialog::show_next_line(world);
            }
        }
        Mode::Save => {
            let choice = world.driver.save_ui.current();
            if choice < cfg::SLOT_COUNT {
                match world.saves.save_to_slot(world, choice) {
                    Ok(()) => messages::post_message(world, "GameSaved", cfg::SAVE_MESSAGE_TIME),
                    Err(err) => error!(target: "general", "Could not save the game: {}", err),
                }
            }
            world.driver.mode = Mode::Walk;
        }
    }
}

pub fn on_up(world: &mut game::World) {
    if world.driver.mode == Mode::Save {
        world.driver.save_ui.move_up();
    }
}

pub fn on_down(world: &mut game::World) {
    if world.driver.mode == Mode::Save {
        world.driver.save_ui.move_down();
    }
}

fn walk(world: &mut game::World) {
    let actions = &world.actions;
    let linear = match (actions.up.is_active(), actions.down.is_active()) {
        (true, false) => Linear::Forward,
        (false, true) => Linear::Backward,
        _ => Linear::Stop,
    };
    let angular = match (actions.left.is_active(), actions.right.is_active()) {
        (true, false) => Angular::Left,
        (false, true) => Angular::Right,
        _ => Angular::Stop,
    };
    world.hero.set_linear(linear);
    world.hero.set_angular(angular);
}

pub fn update(world: &mut game::World, _dt: f32) {
    let walking = world.driver.mode == Mode::Walk;
    world.actions.set_arrows_continuous(walking);
    if walking {
        walk(world);
    } else {
        if world.actions.up.is_active() {
            on_up(world);
        }
        if world.actions.down.is_active() {
            on_down(world);
        }
    }
    if world.actions.close.is_active() && world.driver.mode == Mode::Save {
        info!(target: "general", "Save cancelled");
        world.driver.mode = Mode::Walk;
    } else if world.actions.use_.is_active() {
        on_use(world);
    }
    if world.driver.mode != Mode::Walk {
        world.hero.stop();
    }
}

pub fn render(world: &game::World, tcod: &mut Tcod) {
    if world.driver.mode != Mode::Save {
        return;
    }
    render::render_menu(
        &mut tcod.root,
        "Save game",
        &world.driver.slots,
        world.driver.save_ui.current(),
        cfg::MENU_WIDTH,
    );
}
