use std::collections::HashMap;

pub type EventType = u64;
pub type HandlerId = u32;

/// FNV-1a, usable in constants so that event types can be named at compile time.
pub const fn hash(name: &str) -> EventType {
    let bytes = name.as_bytes();
    let mut value: u64 = 0xcbf2_9ce4_8422_2325;
    let mut i = 0;
    while i < bytes.len() {
        value ^= bytes[i] as u64;
        value = value.wrapping_mul(0x0000_0100_0000_01b3);
        i += 1;
    }
    value
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventStatus {
    Keep,
    Die,
}

pub trait Event {
    fn event_type(&self) -> EventType;
}

pub type Handler<C, E> = fn(&mut C, EventType, &mut E) -> EventStatus;

pub struct EventManager<C, E> {
    next_id: HandlerId,
    handlers: HashMap<EventType, Vec<(HandlerId, Handler<C, E>)>>,
}

impl<C, E> Default for EventManager<C, E> {
    fn default() -> Self {
        EventManager {
            next_id: 0,
            handlers: HashMap::new(),
        }
    }
}

impl<C, E> EventManager<C, E> {
    pub fn register(&mut self, event_type: EventType, handler: Handler<C, E>) -> HandlerId {
        self.next_id += 1;
        self.handlers
            .entry(event_type)
            .or_default()
            .push((self.next_id, handler));
        self.next_id
    }

    pub fn unregister(&mut self, event_type: EventType, id: HandlerId) -> bool {
        match self.handlers.get_mut(&event_type) {
            Some(list) => {
                let len = list.len();
                list.retain(|&(handler_id, _)| handler_id != id);
                list.len() != len
            }
            None => false,
        }
    }

    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers.get(&event_type).map_or(0, Vec::len)
    }

    fn snapshot(&self, event_type: EventType) -> Vec<(HandlerId, Handler<C, E>)> {
        self.handlers
            .get(&event_type)
            .cloned()
            .unwrap_or_default()
    }
}

/// Anything that owns an event manager dispatching to itself.
pub trait EventContext: Sized {
    type Event: Event;

    fn event_manager(&mut self) -> &mut EventManager<Self, Self::Event>;
}

/// Calls every handler registered for the event type, in registration order.
/// Handlers registered while dispatching are only called for later events.
pub fn trigger_event<C: EventContext>(ctx: &mut C, event: &mut C::Event) {
    let event_type = event.event_type();
    let handlers = ctx.event_manager().snapshot(event_type);
    for (id, handler) in handlers {
        if handler(ctx, event_type, event) == EventStatus::Die {
            ctx.event_manager().unregister(event_type, id);
        }
    }
}

#[cfg(test)]
mod event_tests {
    use super::*;

    const PING: EventType = hash("Ping");
    const PONG: EventType = hash("Pong");

    enum TestEvent {
        Ping(u32),
        Pong,
    }

    impl Event for TestEvent {
        fn event_type(&self) -> EventType {
            match self {
                TestEvent::Ping(_) => PING,
                TestEvent::Pong => PONG,
            }
        }
    }

    #[derive(Default)]
    struct Context {
        events: EventManager<Context, TestEvent>,
        calls: Vec<&'static str>,
    }

    impl EventContext for Context {
        type Event = TestEvent;

        fn event_manager(&mut self) -> &mut EventManager<Self, TestEvent> {
            &mut self.events
        }
    }

    fn first(ctx: &mut Context, _: EventType, event: &mut TestEvent) -> EventStatus {
        if let TestEvent::Ping(count) = event {
            *count += 1;
        }
        ctx.calls.push("first");
        EventStatus::Keep
    }

    fn once(ctx: &mut Context, _: EventType, _: &mut TestEvent) -> EventStatus {
        ctx.calls.push("once");
        EventStatus::Die
    }

    fn relay(ctx: &mut Context, _: EventType, _: &mut TestEvent) -> EventStatus {
        ctx.calls.push("relay");
        trigger_event(ctx, &mut TestEvent::Pong);
        EventStatus::Keep
    }

    fn pong(ctx: &mut Context, _: EventType, _: &mut TestEvent) -> EventStatus {
        ctx.calls.push("pong");
        EventStatus::Keep
    }

    fn late(ctx: &mut Context, _: EventType, _: &mut TestEvent) -> EventStatus {
        ctx.calls.push("late");
        EventStatus::Keep
    }

    fn registers_late(ctx: &mut Context, _: EventType, _: &mut TestEvent) -> EventStatus {
        ctx.events.register(PING, late);
        EventStatus::Die
    }

    #[test]
    fn hash_is_stable_and_distinct() {
        assert_eq!(hash("HeroLocation"), hash("HeroLocation"));
        assert_ne!(hash("ViewUp"), hash("ViewDown"));
        assert_eq!(hash(""), 0xcbf2_9ce4_8422_2325);
    }

    #[test]
    fn handlers_are_called_in_order_and_can_mutate_the_payload() {
        let mut ctx = Context::default();
        ctx.events.register(PING, first);
        ctx.events.register(PING, once);
        let mut event = TestEvent::Ping(0);
        trigger_event(&mut ctx, &mut event);
        assert_eq!(ctx.calls, vec!["first", "once"]);
        assert!(matches!(event, TestEvent::Ping(1)));
    }

    #[test]
    fn dying_handlers_are_removed() {
        let mut ctx = Context::default();
        ctx.events.register(PING, once);
        trigger_event(&mut ctx, &mut TestEvent::Ping(0));
        trigger_event(&mut ctx, &mut TestEvent::Ping(0));
        assert_eq!(ctx.calls, vec!["once"]);
        assert_eq!(ctx.events.handler_count(PING), 0);
    }

    #[test]
    fn handlers_can_trigger_other_events() {
        let mut ctx = Context::default();
        ctx.events.register(PING, relay);
        ctx.events.register(PONG, pong);
        trigger_event(&mut ctx, &mut TestEvent::Ping(0));
        assert_eq!(ctx.calls, vec!["relay", "pong"]);
    }

    #[test]
    fn handlers_registered_during_dispatch_wait_for_the_next_event() {
        let mut ctx = Context::default();
        ctx.events.register(PING, registers_late);
        trigger_event(&mut ctx, &mut TestEvent::Ping(0));
        assert!(ctx.calls.is_empty());
        trigger_event(&mut ctx, &mut TestEvent::Ping(0));
        assert_eq!(ctx.calls, vec!["late"]);
    }

    #[test]
    fn unregister_and_missing_types() {
        let mut ctx = Context::default();
        let id = ctx.events.register(PONG, pong);
        assert!(ctx.events.unregister(PONG, id));
        assert!(!ctx.events.unregister(PONG, id));
        assert!(!ctx.events.unregister(PING, id));
        trigger_event(&mut ctx, &mut TestEvent::Pong);
        assert!(ctx.calls.is_empty());
    }
}
