pub mod agent;
pub mod follow_up;
pub mod ids;
pub mod lead;
pub mod mobile;
pub mod status;

pub use agent::{Agent, AgentName, Role};
pub use follow_up::{FollowUp, FollowUpEvent};
pub use ids::{FollowUpEventId, LeadId};
pub use lead::Lead;
pub use mobile::{mobile_is_canonical, normalize_mobile};
pub use status::{parse_status, LeadStatus};
