use crate::engine::event::hash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type RequirementId = u64;

/// Story flags, stored by the hash of their name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementManager {
    requirements: BTreeSet<RequirementId>,
}

impl RequirementManager {
    pub fn has_requirement(&self, name: &str) -> bool {
        self.has_requirement_id(hash(name))
    }

    pub fn has_requirement_id(&self, id: RequirementId) -> bool {
        self.requirements.contains(&id)
    }

    pub fn add_requirement(&mut self, name: &str) {
        self.add_requirement_id(hash(name));
    }

    pub fn add_requirement_id(&mut self, id: RequirementId) {
        self.requirements.insert(id);
    }

    pub fn remove_requirement(&mut self, name: &str) {
        self.remove_requirement_id(hash(name));
    }

    pub fn remove_requirement_id(&mut self, id: RequirementId) {
        self.requirements.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}
