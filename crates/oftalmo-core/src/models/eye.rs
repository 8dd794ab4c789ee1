use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which eye a finding belongs to. Right (OD) always sorts before left (OS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Eye {
    Right,
    Left,
}

impl Eye {
    pub const ALL: [Eye; 2] = [Eye::Right, Eye::Left];

    /// Clinical abbreviation (OD / OS).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Eye::Right => "OD",
            Eye::Left => "OS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Eye::Right => "Right eye",
            Eye::Left => "Left eye",
        }
    }
}
