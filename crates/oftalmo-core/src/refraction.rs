//! Best-refraction reduction.

use serde::Serialize;
use ts_rs::TS;

use crate::models::eye::Eye;
use crate::models::refraction::Refraction;

/// The refraction of `eye` with the best visual acuity.
///
/// Ties keep the earliest entry in `refractions`. Returns `None` when the eye
/// has no refraction recorded.
pub fn best_refraction(refractions: &[Refraction], eye: Eye) -> Option<&Refraction> {
    refractions
        .iter()
        .filter(|r| r.eye == eye)
        .fold(None, |best: Option<&Refraction>, candidate| match best {
            Some(current) if current.visual_acuity >= candidate.visual_acuity => Some(current),
            _ => Some(candidate),
        })
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct BestRefractions {
    pub right: Option<Refraction>,
    pub left: Option<Refraction>,
}

impl BestRefractions {
    pub fn for_eye(&self, eye: Eye) -> Option<&Refraction> {
        match eye {
            Eye::Right => self.right.as_ref(),
            Eye::Left => self.left.as_ref(),
        }
    }
}

pub fn best_refractions(refractions: &[Refraction]) -> BestRefractions {
    BestRefractions {
        right: best_refraction(refractions, Eye::Right).cloned(),
        left: best_refraction(refractions, Eye::Left).cloned(),
    }
}
