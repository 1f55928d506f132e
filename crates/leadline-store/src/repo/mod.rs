pub mod agents;
pub mod follow_ups;
pub mod leads;
pub mod rotation;

pub use agents::AgentsRepo;
pub use follow_ups::FollowUpsRepo;
pub use leads::{LeadNew, LeadPatch, LeadsRepo, UpdateOutcome};
pub use rotation::RotationRepo;
