// The four resource kinds the API serves, plus the transient membership
// record. Entities are immutable: fields are private, constructors validate,
// and an "update" means replacing the entity held at an index.
//
// Each entity has a serde payload struct mirroring the server's wire field
// names (foreign keys are `topic`, `group`, `goal` on the wire). `to_payload`
// never serializes an absent id; `from_payload` re-runs the same validation
// as direct construction.

use serde::{Deserialize, Serialize};

use crate::domain::values::{GoalDescription, GoalTitle, GroupName, Link, Points, TopicTitle};
use crate::error::{Error, Result};

fn validate_id(field: &'static str, id: u64) -> Result<u64> {
    if id == 0 {
        return Err(Error::validation(field, "must be at least 1, got 0"));
    }
    Ok(id)
}

fn validate_optional_id(id: Option<u64>) -> Result<Option<u64>> {
    id.map(|v| validate_id("id", v)).transpose()
}

/// A project topic offered by staff.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Topic {
    title: TopicTitle,
    id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl Topic {
    pub fn new(title: TopicTitle) -> Self {
        Topic { title, id: None }
    }

    pub fn title(&self) -> &TopicTitle {
        &self.title
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn to_payload(&self) -> TopicPayload {
        TopicPayload {
            title: self.title.as_str().to_owned(),
            id: self.id,
        }
    }

    pub fn from_payload(payload: TopicPayload) -> Result<Self> {
        Ok(Topic {
            title: TopicTitle::new(payload.title)?,
            id: validate_optional_id(payload.id)?,
        })
    }
}

/// A gradable goal groups can take on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Goal {
    title: GoalTitle,
    description: GoalDescription,
    points: Points,
    id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPayload {
    pub title: String,
    pub description: String,
    pub points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl Goal {
    pub fn new(title: GoalTitle, description: GoalDescription, points: Points) -> Self {
        Goal {
            title,
            description,
            points,
            id: None,
        }
    }

    pub fn title(&self) -> &GoalTitle {
        &self.title
    }

    pub fn description(&self) -> &GoalDescription {
        &self.description
    }

    pub fn points(&self) -> Points {
        self.points
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn to_payload(&self) -> GoalPayload {
        GoalPayload {
            title: self.title.as_str().to_owned(),
            description: self.description.as_str().to_owned(),
            points: self.points.value(),
            id: self.id,
        }
    }

    pub fn from_payload(payload: GoalPayload) -> Result<Self> {
        Ok(Goal {
            title: GoalTitle::new(payload.title)?,
            description: GoalDescription::new(payload.description)?,
            points: Points::create(payload.points)?,
            id: validate_optional_id(payload.id)?,
        })
    }
}

/// A student group working a topic, with links to its deliverables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupProject {
    name: GroupName,
    topic_id: u64,
    link_django: Link,
    link_tui: Link,
    link_gui: Link,
    id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupProjectPayload {
    pub name: String,
    #[serde(rename = "topic")]
    pub topic_id: u64,
    #[serde(default)]
    pub link_django: String,
    #[serde(default)]
    pub link_tui: String,
    #[serde(default)]
    pub link_gui: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl GroupProject {
    pub fn new(
        name: GroupName,
        topic_id: u64,
        link_django: Link,
        link_tui: Link,
        link_gui: Link,
    ) -> Result<Self> {
        Ok(GroupProject {
            name,
            topic_id: validate_id("topic_id", topic_id)?,
            link_django,
            link_tui,
            link_gui,
            id: None,
        })
    }

    pub fn name(&self) -> &GroupName {
        &self.name
    }

    pub fn topic_id(&self) -> u64 {
        self.topic_id
    }

    pub fn link_django(&self) -> &Link {
        &self.link_django
    }

    pub fn link_tui(&self) -> &Link {
        &self.link_tui
    }

    pub fn link_gui(&self) -> &Link {
        &self.link_gui
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn to_payload(&self) -> GroupProjectPayload {
        GroupProjectPayload {
            name: self.name.as_str().to_owned(),
            topic_id: self.topic_id,
            link_django: self.link_django.as_str().to_owned(),
            link_tui: self.link_tui.as_str().to_owned(),
            link_gui: self.link_gui.as_str().to_owned(),
            id: self.id,
        }
    }

    pub fn from_payload(payload: GroupProjectPayload) -> Result<Self> {
        Ok(GroupProject {
            name: GroupName::new(payload.name)?,
            topic_id: validate_id("topic_id", payload.topic_id)?,
            link_django: Link::new(payload.link_django)?,
            link_tui: Link::new(payload.link_tui)?,
            link_gui: Link::new(payload.link_gui)?,
            id: validate_optional_id(payload.id)?,
        })
    }
}

/// A goal assigned to a group, with a completion flag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupGoal {
    group_id: u64,
    goal_id: u64,
    complete: bool,
    id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupGoalPayload {
    #[serde(rename = "group")]
    pub group_id: u64,
    #[serde(rename = "goal")]
    pub goal_id: u64,
    #[serde(default)]
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl GroupGoal {
    pub fn new(group_id: u64, goal_id: u64) -> Result<Self> {
        Ok(GroupGoal {
            group_id: validate_id("group_id", group_id)?,
            goal_id: validate_id("goal_id", goal_id)?,
            complete: false,
            id: None,
        })
    }

    pub fn group_id(&self) -> u64 {
        self.group_id
    }

    pub fn goal_id(&self) -> u64 {
        self.goal_id
    }

    pub fn complete(&self) -> bool {
        self.complete
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn to_payload(&self) -> GroupGoalPayload {
        GroupGoalPayload {
            group_id: self.group_id,
            goal_id: self.goal_id,
            complete: self.complete,
            id: self.id,
        }
    }

    pub fn from_payload(payload: GroupGoalPayload) -> Result<Self> {
        Ok(GroupGoal {
            group_id: validate_id("group_id", payload.group_id)?,
            goal_id: validate_id("goal_id", payload.goal_id)?,
            complete: payload.complete,
            id: validate_optional_id(payload.id)?,
        })
    }
}

/// Membership row tying a user to a group. Not mirrored locally, only used
/// while loading and when joining/leaving.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserGroup {
    user_id: u64,
    group_id: u64,
    id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroupPayload {
    #[serde(rename = "user")]
    pub user_id: u64,
    #[serde(rename = "group")]
    pub group_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl UserGroup {
    pub fn new(user_id: u64, group_id: u64) -> Result<Self> {
        Ok(UserGroup {
            user_id: validate_id("user_id", user_id)?,
            group_id: validate_id("group_id", group_id)?,
            id: None,
        })
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn group_id(&self) -> u64 {
        self.group_id
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn to_payload(&self) -> UserGroupPayload {
        UserGroupPayload {
            user_id: self.user_id,
            group_id: self.group_id,
            id: self.id,
        }
    }

    pub fn from_payload(payload: UserGroupPayload) -> Result<Self> {
        Ok(UserGroup {
            user_id: validate_id("user_id", payload.user_id)?,
            group_id: validate_id("group_id", payload.group_id)?,
            id: validate_optional_id(payload.id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(title: &str, points: i64) -> Goal {
        Goal::new(
            GoalTitle::new(title).unwrap(),
            GoalDescription::new("desc").unwrap(),
            Points::create(points).unwrap(),
        )
    }

    #[test]
    fn topic_payload_round_trip() {
        let topic = Topic::from_payload(TopicPayload {
            title: "Compilers".into(),
            id: Some(3),
        })
        .unwrap();
        let back = Topic::from_payload(topic.to_payload()).unwrap();
        assert_eq!(back, topic);
        assert_eq!(back.id(), Some(3));
    }

    #[test]
    fn goal_payload_round_trip() {
        let original = GoalPayload {
            title: "Write report".into(),
            description: "At least ten pages".into(),
            points: 4,
            id: Some(7),
        };
        let goal = Goal::from_payload(original).unwrap();
        let back = Goal::from_payload(goal.to_payload()).unwrap();
        assert_eq!(back, goal);
        assert_eq!(back.points().value(), 4);
    }

    #[test]
    fn group_project_payload_round_trip_with_default_links() {
        let payload: GroupProjectPayload =
            serde_json::from_str(r#"{"name":"Alpha","topic":2,"id":9}"#).unwrap();
        let group = GroupProject::from_payload(payload).unwrap();
        assert!(group.link_django().is_empty());
        let back = GroupProject::from_payload(group.to_payload()).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn group_goal_payload_round_trip() {
        let gg = GroupGoal::from_payload(GroupGoalPayload {
            group_id: 1,
            goal_id: 2,
            complete: true,
            id: Some(5),
        })
        .unwrap();
        let back = GroupGoal::from_payload(gg.to_payload()).unwrap();
        assert_eq!(back, gg);
        assert!(back.complete());
    }

    #[test]
    fn user_group_payload_round_trip() {
        let ug = UserGroup::new(4, 9).unwrap();
        let back = UserGroup::from_payload(ug.to_payload()).unwrap();
        assert_eq!(back, ug);
    }

    #[test]
    fn zero_ids_are_rejected() {
        assert!(GroupGoal::new(0, 1).is_err());
        assert!(GroupGoal::new(1, 0).is_err());
        assert!(UserGroup::new(0, 1).is_err());
        assert!(GroupProject::new(
            GroupName::new("Alpha").unwrap(),
            0,
            Link::empty(),
            Link::empty(),
            Link::empty(),
        )
        .is_err());
        assert!(Topic::from_payload(TopicPayload {
            title: "Networks".into(),
            id: Some(0),
        })
        .is_err());
    }

    #[test]
    fn invalid_payload_fields_are_rejected() {
        assert!(Goal::from_payload(GoalPayload {
            title: "".into(),
            description: "d".into(),
            points: 3,
            id: None,
        })
        .is_err());
        assert!(Goal::from_payload(GoalPayload {
            title: "t".into(),
            description: "d".into(),
            points: 6,
            id: None,
        })
        .is_err());
    }

    #[test]
    fn absent_id_is_not_serialized() {
        let json = serde_json::to_value(goal("A", 3).to_payload()).unwrap();
        assert!(json.get("id").is_none());
    }
}
