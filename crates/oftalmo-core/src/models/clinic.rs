use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::patient::non_blank;

/// An outpatient clinic ("ambulatório") grouping collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Clinic {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub collaborator_ids: Vec<Uuid>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub collaborator_ids: Vec<Uuid>,
}

impl Clinic {
    pub fn from_input(input: ClinicInput, now: jiff::Timestamp) -> Self {
        let mut clinic = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            description: None,
            collaborator_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        clinic.replace(input, now);
        clinic
    }

    pub fn replace(&mut self, input: ClinicInput, now: jiff::Timestamp) {
        self.name = input.name.trim().to_string();
        self.description = non_blank(input.description);
        self.collaborator_ids.clear();
        for id in input.collaborator_ids {
            self.add_collaborator(id);
        }
        self.updated_at = now;
    }

    /// Returns `true` if the collaborator was not already a member.
    pub fn add_collaborator(&mut self, id: Uuid) -> bool {
        if self.collaborator_ids.contains(&id) {
            return false;
        }
        self.collaborator_ids.push(id);
        true
    }

    /// Returns `true` if the collaborator was a member.
    pub fn remove_collaborator(&mut self, id: Uuid) -> bool {
        let before = self.collaborator_ids.len();
        self.collaborator_ids.retain(|c| *c != id);
        before != self.collaborator_ids.len()
    }
}
