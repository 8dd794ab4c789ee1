use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::patient::non_blank;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Collaborator {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: CollaboratorRole,
    /// Regional medical council registration.
    pub crm: Option<String>,
    pub active: bool,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CollaboratorRole {
    Staff,
    Resident,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollaboratorInput {
    pub name: String,
    pub email: String,
    pub role: CollaboratorRole,
    #[serde(default)]
    pub crm: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Collaborator {
    pub fn from_input(input: CollaboratorInput, now: jiff::Timestamp) -> Self {
        let mut collaborator = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            email: String::new(),
            role: input.role,
            crm: None,
            active: input.active,
            created_at: now,
            updated_at: now,
        };
        collaborator.replace(input, now);
        collaborator
    }

    pub fn replace(&mut self, input: CollaboratorInput, now: jiff::Timestamp) {
        self.name = input.name.trim().to_string();
        self.email = input.email.trim().to_lowercase();
        self.role = input.role;
        self.crm = non_blank(input.crm);
        self.active = input.active;
        self.updated_at = now;
    }
}
