use crate::cfg;
use crate::engine::asset;
use crate::engine::event::{hash, EventStatus, EventType};
use crate::engine::game::{self, GameEvent};
use crate::systems::{dialog, messages};
use log::{error, info};
use serde::Deserialize;
use std::path::Path;

/// A zone event that opens a dialog.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Trigger {
    pub event: String,
    pub dialog: String,
    #[serde(default)]
    pub once: bool,
    #[serde(skip)]
    fired: bool,
}

/// What happens when a dialog is over.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DialogEndRule {
    pub dialog: String,
    pub character: Option<String>,
    pub attach: Option<String>,
    pub quest: bool,
    pub detach: bool,
    pub grant: Vec<String>,
    pub revoke: Vec<String>,
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Story {
    #[serde(rename = "trigger")]
    triggers: Vec<Trigger>,
    #[serde(rename = "dialog_end")]
    dialog_ends: Vec<DialogEndRule>,
}

impl Story {
    /// A story that can not be read is logged and left empty.
    pub fn load(path: &Path) -> Story {
        match asset::read_toml::<Story>(path) {
            Ok(story) => {
                info!(
                    target: "resources",
                    "Story loaded: {} triggers, {} dialog ends",
                    story.triggers.len(),
                    story.dialog_ends.len()
                );
                story
            }
            Err(err) => {
                error!(target: "resources", "Could not load the story: {}", err);
                Story::default()
            }
        }
    }

    pub fn from_toml(text: &str) -> Result<Story, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn dialog_ends(&self) -> &[DialogEndRule] {
        &self.dialog_ends
    }

    fn event_types(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = self.triggers.iter().map(|t| hash(&t.event)).collect();
        types.sort_unstable();
        types.dedup();
        types
    }

    /// Dialogs to open for this event, skipping spent one-shot triggers.
    fn pending_dialogs(&self, event_type: EventType) -> Vec<(usize, String)> {
        self.triggers
            .iter()
            .enumerate()
            .filter(|(_, trigger)| hash(&trigger.event) == event_type && !trigger.fired)
            .map(|(index, trigger)| (index, trigger.dialog.clone()))
            .collect()
    }

    fn is_spent(&self, event_type: EventType) -> bool {
        self.triggers
            .iter()
            .filter(|trigger| hash(&trigger.event) == event_type)
            .all(|trigger| trigger.once && trigger.fired)
    }
}

pub fn register(world: &mut game::World) {
    for event_type in world.story.event_types() {
        world.events.register(event_type, on_trigger);
    }
    world.events.register(game::DIALOG_END, on_dialog_end);
}

fn on_trigger(world: &mut game::World, event_type: EventType, _: &mut GameEvent) -> EventStatus {
    for (index, dialog_name) in world.story.pending_dialogs(event_type) {
        if dialog::start(world, &dialog_name) && world.story.triggers[index].once {
            world.story.triggers[index].fired = true;
        }
    }
    if world.story.is_spent(event_type) {
        EventStatus::Die
    } else {
        EventStatus::Keep
    }
}

fn on_dialog_end(world: &mut game::World, _: EventType, event: &mut GameEvent) -> EventStatus {
    let name = match event {
        GameEvent::DialogEnd { name } => name.clone(),
        _ => return EventStatus::Keep,
    };
    let rules: Vec<DialogEndRule> = world
        .story
        .dialog_ends
        .iter()
        .filter(|rule| rule.dialog == name)
        .cloned()
        .collect();
    for rule in rules {
        apply(world, &rule);
    }
    EventStatus::Keep
}

fn apply(world: &mut game::World, rule: &DialogEndRule) {
    if let Some(character) = rule
        .character
        .as_ref()
        .and_then(|name| world.characters.character_mut(name))
    {
        if rule.detach {
            character.detach_dialog();
        }
        match (&rule.attach, rule.quest) {
            (Some(dialog), true) => character.attach_quest_dialog(dialog),
            (Some(dialog), false) => character.attach_dialog(dialog),
            (None, _) => (),
        }
    }
    for requirement in &rule.grant {
        world.requirements.add_requirement(requirement);
    }
    for requirement in &rule.revoke {
        world.requirements.remove_requirement(requirement);
    }
    if let Some(message) = &rule.message {
        messages::post_message(world, message, cfg::SAVE_MESSAGE_TIME);
    }
}
