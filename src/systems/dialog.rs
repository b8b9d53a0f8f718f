use crate::cfg;
use crate::cmtp::{DialogData, DialogLine};
use crate::engine::asset::DataManager;
use crate::engine::game::{self, GameEvent, Tcod};
use crate::systems::render;
use log::{info, warn};
use tcod::{console, Console as _};

#[derive(Debug, PartialEq)]
pub enum Advance {
    NextLine,
    Ended(String),
    NoDialog,
}

#[derive(Debug, Default)]
pub struct DialogManager {
    current: Option<(String, DialogData)>,
    line: usize,
}

impl DialogManager {
    pub fn start(&mut self, data: &DataManager, name: &str) -> bool {
        if self.current.is_some() {
            warn!(
                target: "general",
                "Can not load a dialogue because one is already loaded: '{}'", name
            );
            return false;
        }
        let dialog = match data.dialog_data_for(name) {
            Some(dialog) if !dialog.content.is_empty() => dialog.clone(),
            _ => return false,
        };
        self.current = Some((name.to_string(), dialog));
        self.line = 0;
        info!(target: "general", "Dialog loaded: '{}'", name);
        true
    }

    /// Moves to the next line. Reaching the end clears the dialog.
    pub fn advance(&mut self) -> Advance {
        let length = match &self.current {
            Some((_, dialog)) => dialog.content.len(),
            None => {
                warn!(target: "general", "The dialogue is not available anymore.");
                return Advance::NoDialog;
            }
        };
        self.line += 1;
        if self.line < length {
            return Advance::NextLine;
        }
        info!(target: "general", "End of the dialogue.");
        self.line = 0;
        match self.current.take() {
            Some((name, _)) => Advance::Ended(name),
            None => Advance::NoDialog,
        }
    }

    pub fn has_next_line(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_line(&self) -> Option<&DialogLine> {
        self.current
            .as_ref()
            .and_then(|(_, dialog)| dialog.content.get(self.line))
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|(name, _)| name.as_str())
    }
}

pub fn start(world: &mut game::World, name: &str) -> bool {
    world.dialogs.start(&world.data, name)
}

/// Shows the next line of the running dialog. At the end, the dialog is
/// closed and `DialogEnd` is triggered.
pub fn show_next_line(world: &mut game::World) -> bool {
    match world.dialogs.advance() {
        Advance::NextLine => true,
        Advance::Ended(name) => {
            game::trigger(world, GameEvent::DialogEnd { name });
            false
        }
        Advance::NoDialog => false,
    }
}

pub fn register(world: &mut game::World) {
    world.heads_up.add_entity("dialog", 10, update, render);
}

pub fn update(_world: &mut game::World, _dt: f32) {}

pub fn render(world: &game::World, tcod: &mut Tcod) {
    let line = match world.dialogs.current_line() {
        Some(line) => line,
        None => return,
    };
    let x = cfg::SCREEN_WIDTH / 2 - cfg::DIALOG_WIDTH / 2;
    let y = cfg::DIALOG_Y;
    let root = &mut tcod.root;
    render::render_box(
        root,
        (x + cfg::DIALOG_PADDING, y - cfg::SPEAKER_HEIGHT),
        (cfg::SPEAKER_WIDTH, cfg::SPEAKER_HEIGHT),
        cfg::COLOR_DARK_SKY,
    );
    render::render_box(
        root,
        (x, y),
        (cfg::DIALOG_WIDTH, cfg::DIALOG_HEIGHT),
        cfg::COLOR_DARKER_SEPIA,
    );
    root.set_default_foreground(cfg::COLOR_LIGHTEST_GREY);
    root.print_rect(
        x + cfg::DIALOG_PADDING + 1,
        y - cfg::SPEAKER_HEIGHT,
        cfg::SPEAKER_WIDTH - 2,
        cfg::SPEAKER_HEIGHT,
        &line.speaker,
    );
    root.print_rect(
        x + cfg::DIALOG_PADDING,
        y + cfg::DIALOG_PADDING,
        cfg::DIALOG_WIDTH - 2 * cfg::DIALOG_PADDING,
        cfg::DIALOG_HEIGHT - 2 * cfg::DIALOG_PADDING,
        &line.words,
    );
    root.print_ex(
        x + cfg::DIALOG_WIDTH - 2,
        y + cfg::DIALOG_HEIGHT - 1,
        console::BackgroundFlag::None,
        console::TextAlignment::Right,
        "[Enter]",
    );
}

/// Why a line does not fit in the dialog boxes, if it does not.
pub fn line_problems(con: &mut impl console::Console, line: &DialogLine) -> Vec<String> {
    let mut problems = Vec::new();
    let width = cfg::DIALOG_WIDTH - 2 * cfg::DIALOG_PADDING;
    let height = cfg::DIALOG_HEIGHT - 2 * cfg::DIALOG_PADDING;
    let longest = line.words.split_whitespace().map(|word| word.chars().count()).max();
    if longest.map_or(false, |longest| longest as i32 > width) {
        problems.push(format!("a word is wider than {} cells", width));
    }
    let lines = con.get_height_rect(0, 0, width, 0, &line.words);
    if lines > height {
        problems.push(format!("words take {} lines out of {}", lines, height));
    }
    let speaker_width = cfg::SPEAKER_WIDTH - 2;
    if line.speaker.chars().count() as i32 > speaker_width {
        problems.push(format!("speaker is wider than {} cells", speaker_width));
    }
    if line.speaker.lines().count() as i32 > cfg::SPEAKER_HEIGHT {
        problems.push(format!("speaker is taller than {} line", cfg::SPEAKER_HEIGHT));
    }
    problems
}

#[cfg(test)]
mod dialog_tests {
    use super::*;
    use crate::engine::event::{EventStatus, EventType};
    use crate::engine::game::test_world;

    fn two_lines() -> DialogData {
        DialogData {
            content: vec![
                DialogLine {
                    speaker: String::from("Shagir"),
                    words: String::from("Hello."),
                },
                DialogLine {
                    speaker: String::from("Kalista"),
                    words: String::from("Hi."),
                },
            ],
        }
    }

    fn data() -> DataManager {
        let mut data = DataManager::default();
        data.insert_dialog("Greetings", two_lines());
        data.insert_dialog("Other", two_lines());
        data
    }

    #[test]
    fn a_dialog_runs_line_by_line() {
        let data = data();
        let mut dialogs = DialogManager::default();
        assert!(!dialogs.has_next_line());
        assert!(dialogs.start(&data, "Greetings"));
        assert!(dialogs.has_next_line());
        assert_eq!(dialogs.current_line().unwrap().speaker, "Shagir");
        assert_eq!(dialogs.advance(), Advance::NextLine);
        assert_eq!(dialogs.current_line().unwrap().words, "Hi.");
        assert_eq!(dialogs.advance(), Advance::Ended(String::from("Greetings")));
        assert!(!dialogs.has_next_line());
        assert!(dialogs.current_line().is_none());
        assert_eq!(dialogs.advance(), Advance::NoDialog);
    }

    #[test]
    fn only_one_dialog_at_a_time() {
        let data = data();
        let mut dialogs = DialogManager::default();
        assert!(dialogs.start(&data, "Greetings"));
        assert!(!dialogs.start(&data, "Other"));
        assert_eq!(dialogs.current_name(), Some("Greetings"));
    }

    #[test]
    fn unknown_dialogs_do_not_start() {
        let data = data();
        let mut dialogs = DialogManager::default();
        assert!(!dialogs.start(&data, "Nothing"));
        assert!(!dialogs.has_next_line());
        assert!(dialogs.start(&data, "Other"));
    }

    #[test]
    fn lines_that_do_not_fit_are_reported() {
        let mut con = console::Offscreen::new(cfg::SCREEN_WIDTH, cfg::SCREEN_HEIGHT);
        let fits = DialogLine {
            speaker: String::from("Shagir"),
            words: String::from("Welcome to the village."),
        };
        assert!(line_problems(&mut con, &fits).is_empty());
        let too_long = DialogLine {
            speaker: String::from("Shagir the very talkative"),
            words: "blah ".repeat(100),
        };
        assert_eq!(line_problems(&mut con, &too_long).len(), 2);
    }

    fn count_end(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
        if let GameEvent::DialogEnd { name } = event {
            world.requirements.add_requirement(name);
        }
        EventStatus::Keep
    }

    #[test]
    fn the_end_of_a_dialog_is_broadcast() {
        let mut world = test_world::world("dialog-end");
        world.data.insert_dialog("Greetings", two_lines());
        world.events.register(game::DIALOG_END, count_end);
        assert!(start(&mut world, "Greetings"));
        assert!(show_next_line(&mut world));
        assert!(!world.requirements.has_requirement("Greetings"));
        assert!(!show_next_line(&mut world));
        assert!(world.requirements.has_requirement("Greetings"));
        assert!(!show_next_line(&mut world));
    }
}
