use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::eye::Eye;
use super::patient::non_blank;

/// A previous or planned ocular surgery recorded during an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Surgery {
    pub id: Uuid,
    pub eye: Eye,
    pub procedure: String,
    pub date: jiff::civil::Date,
    pub surgeon: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurgeryInput {
    pub eye: Eye,
    pub procedure: String,
    pub date: jiff::civil::Date,
    #[serde(default)]
    pub surgeon: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Surgery {
    pub fn from_input(input: SurgeryInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            eye: input.eye,
            procedure: input.procedure.trim().to_string(),
            date: input.date,
            surgeon: non_blank(input.surgeon),
            notes: non_blank(input.notes),
        }
    }
}
