use clap::Parser;
use env_logger::Env;
use expt02::cfg::*;
use expt02::engine::game::{self, Tcod, World};
use expt02::engine::save::SavePointManager;
use expt02::settings::{Cli, Settings};
use expt02::systems::driver::{Mode, StartChoice, StartDriver};
use expt02::systems::input::GameActions;
use log::{error, info};
use std::process;
use tcod::{console, Console as _};

fn init_root(settings: &Settings) -> console::Root {
    let mut initializer = console::Root::initializer();
    if let Some(font) = &settings.font {
        initializer
            .font(font, console::FontLayout::AsciiInRow)
            .font_type(console::FontType::Default);
    }
    initializer
        .size(SCREEN_WIDTH, SCREEN_HEIGHT)
        .title("saintech's experiments: Expt02")
        .fullscreen(settings.fullscreen)
        .init()
}

fn toggle_fullscreen(root: &mut console::Root) {
    let fullscreen = root.is_fullscreen();
    root.set_fullscreen(!fullscreen);
}

/// Title screen loop, until a game is started or the player quits.
fn start_scene(tcod: &mut Tcod, saves: &SavePointManager) -> StartChoice {
    let mut start = StartDriver::default();
    let mut actions = GameActions::default();
    actions.set_arrows_continuous(false);
    while !tcod.root.window_closed() {
        actions.poll(false);
        if actions.fullscreen.is_active() {
            toggle_fullscreen(&mut tcod.root);
        }
        let choice = start.update(&actions, saves);
        actions.reset();
        if choice != StartChoice::None {
            return choice;
        }
        tcod.root.set_default_background(COLOR_DARKEST_GREY);
        tcod.root.clear();
        start.render(&mut tcod.root);
        tcod.root.flush();
    }
    StartChoice::Quit
}

fn game_scene(tcod: &mut Tcod, world: &mut World) {
    loop {
        let closed = tcod.root.window_closed();
        world.actions.poll(closed);
        if world.actions.close.is_active() && world.driver.mode() == Mode::Walk {
            info!(target: "general", "Bye");
            return;
        }
        if world.actions.fullscreen.is_active() {
            toggle_fullscreen(&mut tcod.root);
        }
        game::update(world, tcod::system::get_last_frame_length());
        world.actions.reset();
        game::render(world, tcod);
        tcod.root.flush();
        if closed {
            return;
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log_level.as_str())).init();
    settings.log_summary();

    tcod::system::set_fps(settings.fps);
    let mut tcod = Tcod {
        root: init_root(&settings),
        con: console::Offscreen::new(SCREEN_WIDTH, SCREEN_HEIGHT),
    };

    let paths = settings.world_paths();
    let saves = SavePointManager::new(paths.save_dir.clone());
    let slot = match start_scene(&mut tcod, &saves) {
        StartChoice::StartNewGame => None,
        StartChoice::LoadSlot(slot) => Some(slot),
        StartChoice::Quit | StartChoice::None => return,
    };

    let mut world = match World::new(&paths) {
        Ok(world) => world,
        Err(err) => {
            error!(target: "resources", "Could not load the world: {}", err);
            process::exit(1);
        }
    };
    if let Some(slot) = slot {
        if let Err(err) = saves.load_from_slot(&mut world, slot) {
            error!(target: "general", "Could not load slot {}: {}", slot, err);
        }
    }
    game_scene(&mut tcod, &mut world);
}
