// Initial mirror load after login: the user record, the user's group
// memberships, then all four resource lists. A row that fails validation is
// skipped with a warning so one bad record cannot block the session; a list
// endpoint answering non-200 is simply left empty.

use std::io::Write;

use serde_json::Value;

use crate::api::ApiClient;
use crate::domain::entities::{
    Goal, GoalPayload, GroupGoal, GroupGoalPayload, GroupProject, GroupProjectPayload, Topic,
    TopicPayload, UserGroupPayload,
};
use crate::error::Result;
use crate::mirror::Mirror;

/// Load everything the mirror tracks. Returns the logged-in user's remote
/// id when `auth/user/` provided one.
pub fn load_all(api: &ApiClient, mirror: &mut Mirror, out: &mut impl Write) -> Result<Option<u64>> {
    let user_id = load_user(api)?;
    load_user_groups(api, mirror, user_id, out)?;

    let groups = api.get("groups/")?;
    if groups.status == 200 {
        apply_group_rows(mirror, &groups.body, out)?;
    }
    let goals = api.get("goals/")?;
    if goals.status == 200 {
        apply_goal_rows(mirror, &goals.body, out)?;
    }
    let topics = api.get("topics/")?;
    if topics.status == 200 {
        apply_topic_rows(mirror, &topics.body, out)?;
    }
    let group_goals = api.get("group-goals/")?;
    if group_goals.status == 200 {
        apply_group_goal_rows(mirror, &group_goals.body, out)?;
    }

    Ok(user_id)
}

fn load_user(api: &ApiClient) -> Result<Option<u64>> {
    let response = api.get("auth/user/")?;
    if response.status != 200 {
        return Ok(None);
    }
    Ok(response.body.get("pk").and_then(Value::as_u64))
}

fn load_user_groups(
    api: &ApiClient,
    mirror: &mut Mirror,
    user_id: Option<u64>,
    out: &mut impl Write,
) -> Result<()> {
    let response = api.get("group-users/")?;
    if response.status != 200 {
        return Ok(());
    }
    mirror.user_groups.clear();
    apply_membership_rows(mirror, &response.body, user_id, out)
}

fn rows(body: &Value) -> &[Value] {
    body.as_array().map(Vec::as_slice).unwrap_or(&[])
}

pub fn apply_membership_rows(
    mirror: &mut Mirror,
    body: &Value,
    user_id: Option<u64>,
    out: &mut impl Write,
) -> Result<()> {
    for row in rows(body) {
        let payload: UserGroupPayload = match serde_json::from_value(row.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                writeln!(out, "Warning: Failed to load membership: {e}")?;
                continue;
            }
        };
        if Some(payload.user_id) == user_id {
            mirror.user_groups.insert(payload.group_id);
        }
    }
    Ok(())
}

macro_rules! apply_rows {
    ($(#[$doc:meta])* $name:ident, $payload:ty, $entity:ident, $push:ident, $label:literal) => {
        $(#[$doc])*
        pub fn $name(mirror: &mut Mirror, body: &Value, out: &mut impl Write) -> Result<()> {
            for row in rows(body) {
                let parsed = serde_json::from_value::<$payload>(row.clone())
                    .map_err(|e| e.to_string())
                    .and_then(|p| $entity::from_payload(p).map_err(|e| e.to_string()));
                match parsed {
                    Ok(entity) => match entity.id() {
                        Some(id) => mirror.$push(entity, id),
                        None => {
                            writeln!(out, concat!("Warning: ", $label, " row has no id, skipped"))?
                        }
                    },
                    Err(e) => {
                        writeln!(out, concat!("Warning: Failed to load ", $label, ": {}"), e)?
                    }
                }
            }
            Ok(())
        }
    };
}

apply_rows!(
    /// Append every valid group row, recording index-to-id as we go.
    apply_group_rows, GroupProjectPayload, GroupProject, push_group, "group"
);
apply_rows!(apply_goal_rows, GoalPayload, Goal, push_goal, "goal");
apply_rows!(apply_topic_rows, TopicPayload, Topic, push_topic, "topic");
apply_rows!(
    apply_group_goal_rows, GroupGoalPayload, GroupGoal, push_group_goal, "group goal"
);
