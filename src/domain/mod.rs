// Domain layer: validated value objects, the immutable entities built from
// them, the aggregate store mirroring the server, and the session token.

pub mod entities;
pub mod store;
pub mod token;
pub mod values;

pub use entities::{
    Goal, GoalPayload, GroupGoal, GroupGoalPayload, GroupProject, GroupProjectPayload, Topic,
    TopicPayload, UserGroup, UserGroupPayload,
};
pub use store::Gpm;
pub use token::Token;
pub use values::{GoalDescription, GoalTitle, GroupName, Link, Points, TopicTitle};
