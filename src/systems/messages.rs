use crate::cfg;
use crate::cmtp::MessageData;
use crate::engine::asset::DataManager;
use crate::engine::game::{self, Tcod};
use crate::systems::render;
use std::collections::VecDeque;
use tcod::{console, Console as _};

#[derive(Debug, Clone, PartialEq)]
struct MessageItem {
    remaining_time: f32,
    data: MessageData,
}

/// Messages shown one after the other, each for its own time.
#[derive(Debug, Default)]
pub struct MessageManager {
    items: VecDeque<MessageItem>,
}

impl MessageManager {
    pub fn post_message(&mut self, data: &DataManager, name: &str, time: f32) {
        if let Some(message) = data.message_data_for(name) {
            self.items.push_back(MessageItem {
                remaining_time: time,
                data: message.clone(),
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(current) = self.items.front_mut() {
            current.remaining_time -= dt;
            if current.remaining_time < 0.0 {
                self.items.pop_front();
            }
        }
    }

    pub fn current(&self) -> Option<&MessageData> {
        self.items.front().map(|item| &item.data)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn post_message(world: &mut game::World, name: &str, time: f32) {
    world.messages.post_message(&world.data, name, time);
}

pub fn register(world: &mut game::World) {
    world.heads_up.add_entity("messages", 5, update, render);
}

pub fn update(world: &mut game::World, dt: f32) {
    world.messages.update(dt);
}

pub fn render(world: &game::World, tcod: &mut Tcod) {
    let message = match world.messages.current() {
        Some(message) => message,
        None => return,
    };
    let x = cfg::SCREEN_WIDTH / 2 - cfg::MESSAGE_WIDTH / 2;
    let height = tcod
        .root
        .get_height_rect(x + 1, 1, cfg::MESSAGE_WIDTH - 2, 0, &message.message)
        + 2;
    render::render_box(
        &mut tcod.root,
        (x, 1),
        (cfg::MESSAGE_WIDTH, height),
        cfg::COLOR_DARK_SKY,
    );
    tcod.root.set_default_foreground(cfg::COLOR_DARKER_SEPIA);
    tcod.root.print_rect_ex(
        cfg::SCREEN_WIDTH / 2,
        2,
        cfg::MESSAGE_WIDTH - 2,
        0,
        console::BackgroundFlag::None,
        console::TextAlignment::Center,
        &message.message,
    );
}

#[cfg(test)]
mod messages_tests {
    use super::*;

    fn data() -> DataManager {
        let mut data = DataManager::default();
        data.insert_message(
            "First",
            MessageData {
                message: String::from("first"),
            },
        );
        data.insert_message(
            "Second",
            MessageData {
                message: String::from("second"),
            },
        );
        data
    }

    #[test]
    fn messages_are_shown_in_order_for_their_time() {
        let data = data();
        let mut messages = MessageManager::default();
        messages.post_message(&data, "First", 1.0);
        messages.post_message(&data, "Second", 0.5);
        assert_eq!(messages.current().unwrap().message, "first");
        messages.update(0.6);
        messages.update(0.6);
        assert_eq!(messages.current().unwrap().message, "second");
        // only the front message is counting down
        messages.update(0.4);
        assert_eq!(messages.current().unwrap().message, "second");
        messages.update(0.2);
        assert!(messages.is_empty());
        messages.update(1.0);
        assert!(messages.current().is_none());
    }

    #[test]
    fn unknown_messages_are_ignored() {
        let data = data();
        let mut messages = MessageManager::default();
        messages.post_message(&data, "Nothing", 1.0);
        assert!(messages.is_empty());
    }
}
