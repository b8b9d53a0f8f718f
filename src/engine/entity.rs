pub type UpdateFn<W> = fn(&mut W, f32);
pub type RenderFn<W, T> = fn(&W, &mut T);

pub struct Entity<W, T> {
    pub name: &'static str,
    pub priority: i32,
    pub update: UpdateFn<W>,
    pub render: RenderFn<W, T>,
}

impl<W, T> Clone for Entity<W, T> {
    fn clone(&self) -> Self {
        Entity {
            name: self.name,
            priority: self.priority,
            update: self.update,
            render: self.render,
        }
    }
}

/// Entities kept sorted by priority, lowest first. Equal priorities keep
/// their insertion order.
pub struct EntityManager<W, T> {
    entities: Vec<Entity<W, T>>,
}

impl<W, T> Default for EntityManager<W, T> {
    fn default() -> Self {
        EntityManager {
            entities: Vec::new(),
        }
    }
}

impl<W, T> EntityManager<W, T> {
    pub fn add_entity(
        &mut self,
        name: &'static str,
        priority: i32,
        update: UpdateFn<W>,
        render: RenderFn<W, T>,
    ) {
        let index = self
            .entities
            .iter()
            .position(|entity| entity.priority > priority)
            .unwrap_or(self.entities.len());
        self.entities.insert(
            index,
            Entity {
                name,
                priority,
                update,
                render,
            },
        );
    }

    pub fn remove_entity(&mut self, name: &str) -> bool {
        let len = self.entities.len();
        self.entities.retain(|entity| entity.name != name);
        self.entities.len() != len
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entities.iter().map(|entity| entity.name).collect()
    }

    /// Copy of the ordered list, so that updates may add or remove entities.
    pub fn snapshot(&self) -> Vec<Entity<W, T>> {
        self.entities.clone()
    }
}

pub fn update_all<W, T>(world: &mut W, dt: f32, manager: fn(&W) -> &EntityManager<W, T>) {
    for entity in manager(world).snapshot() {
        (entity.update)(world, dt);
    }
}

pub fn render_all<W, T>(world: &W, target: &mut T, manager: &EntityManager<W, T>) {
    for entity in &manager.entities {
        (entity.render)(world, target);
    }
}
