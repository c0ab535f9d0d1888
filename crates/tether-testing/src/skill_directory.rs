use async_trait::async_trait;

use tether_core::identifiers::OrgId;
use tether_core::skill::{Skill, SkillName};
use tether_engine::ports::{PortError, SkillDirectory};

/// Skill directory fake with separate owned and shared shelves.
#[derive(Debug, Default)]
pub struct StaticSkillDirectory {
    owned: Vec<Skill>,
    shared: Vec<Skill>,
}

impl StaticSkillDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owned(mut self, skill: Skill) -> Self {
        self.owned.push(skill);
        self
    }

    pub fn with_shared(mut self, skill: Skill) -> Self {
        self.shared.push(skill);
        self
    }
}

fn find(shelf: &[Skill], name: &SkillName) -> Option<Skill> {
    shelf.iter().find(|skill| &skill.name == name).cloned()
}

#[async_trait]
impl SkillDirectory for StaticSkillDirectory {
    async fn find_owned(
        &self,
        _org: &OrgId,
        name: &SkillName,
    ) -> Result<Option<Skill>, PortError> {
        Ok(find(&self.owned, name))
    }

    async fn find_shared(
        &self,
        _org: &OrgId,
        name: &SkillName,
    ) -> Result<Option<Skill>, PortError> {
        Ok(find(&self.shared, name))
    }
}
