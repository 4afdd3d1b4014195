mod collider;
mod tuning;

pub use collider::{ColliderGenerationSettings, ColliderKind};
pub use tuning::{GenerationTuning, MidpointTest};
