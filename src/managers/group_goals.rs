// Group-goal assignments: listing (resolving group names and goal titles
// from the mirror), staff assign/remove, and the completion toggle. The
// toggle PATCHes the server and then replaces the stored entity in place at
// the same index, so ordering and id bookkeeping are untouched.

use std::io::Write;

use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::domain::entities::{GroupGoal, GroupGoalPayload};
use crate::error::{Error, Result};
use crate::mirror::Mirror;
use crate::ui;

fn group_name_for(mirror: &Mirror, group_id: u64) -> String {
    for index in 0..mirror.store.number_of_groups() {
        if let Ok(group) = mirror.store.group_at_index(index) {
            if group.id() == Some(group_id) {
                return group.name().as_str().to_owned();
            }
        }
    }
    "Unknown".to_owned()
}

fn goal_title_for(mirror: &Mirror, goal_id: u64) -> String {
    for index in 0..mirror.store.number_of_goals() {
        if let Ok(goal) = mirror.store.goal_at_index(index) {
            if goal.id() == Some(goal_id) {
                return goal.title().as_str().to_owned();
            }
        }
    }
    "Unknown".to_owned()
}

pub fn render(mirror: &Mirror, out: &mut impl Write) -> std::io::Result<()> {
    let rule = "-".repeat(120);
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "{:>3} {:<30} {:<40} {:<10}",
        "Idx", "GROUP", "GOAL", "COMPLETE"
    )?;
    writeln!(out, "{rule}")?;
    for index in 0..mirror.store.number_of_group_goals() {
        if let Ok(gg) = mirror.store.group_goal_at_index(index) {
            writeln!(
                out,
                "{:>3} {:<30} {:<40} {:<10}",
                index + 1,
                ui::clip(&group_name_for(mirror, gg.group_id()), 30),
                ui::clip(&goal_title_for(mirror, gg.goal_id()), 40),
                if gg.complete() { "yes" } else { "no" }
            )?;
        }
    }
    writeln!(out, "{rule}")
}

pub fn add_group_goal(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let group_id = ui::read_value("Group ID", |s| ui::parse_remote_id("group_id", s))?;
    let goal_id = ui::read_value("Goal ID", |s| ui::parse_remote_id("goal_id", s))?;
    let group_goal = GroupGoal::new(group_id, goal_id)?;
    create(api, mirror, &group_goal)?;
    writeln!(out, "Group Goal added!")?;
    Ok(())
}

pub fn create(api: &ApiClient, mirror: &mut Mirror, group_goal: &GroupGoal) -> Result<()> {
    let body = serde_json::to_value(group_goal.to_payload())
        .map_err(|e| Error::validation("group_goal", e.to_string()))?;
    let response = api.post("group-goals/", &body)?;
    if response.status != 201 {
        return Err(response.into_remote_error());
    }
    apply_created(mirror, &response.body)
}

pub fn apply_created(mirror: &mut Mirror, body: &Value) -> Result<()> {
    let payload: GroupGoalPayload = serde_json::from_value(body.clone())
        .map_err(|e| Error::validation("group_goal", format!("unexpected create response: {e}")))?;
    let group_goal = GroupGoal::from_payload(payload)?;
    let id = group_goal
        .id()
        .ok_or_else(|| Error::validation("group_goal", "create response carries no id"))?;
    mirror.push_group_goal(group_goal, id);
    Ok(())
}

pub fn remove_group_goal(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let index = match ui::read_index(
        "Enter index (0 to cancel)",
        mirror.store.number_of_group_goals(),
    )? {
        Some(index) => index,
        None => {
            writeln!(out, "Cancelled!")?;
            return Ok(());
        }
    };
    remove(api, mirror, index)?;
    writeln!(out, "Group Goal removed!")?;
    Ok(())
}

pub fn remove(api: &ApiClient, mirror: &mut Mirror, index: usize) -> Result<()> {
    let group_goal_id = mirror.group_goal_id_at(index)?;
    let response = api.delete(&format!("group-goals/{group_goal_id}/"))?;
    if response.status != 204 {
        return Err(response.into_remote_error());
    }
    mirror.remove_group_goal(index)?;
    Ok(())
}

pub fn toggle_group_goal(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let index = match ui::read_index(
        "Enter index (0 to cancel)",
        mirror.store.number_of_group_goals(),
    )? {
        Some(index) => index,
        None => {
            writeln!(out, "Cancelled!")?;
            return Ok(());
        }
    };
    toggle(api, mirror, index)?;
    writeln!(out, "Group Goal toggled!")?;
    Ok(())
}

/// PATCH the negated flag; on 200 swap in the server's updated row at the
/// same index.
pub fn toggle(api: &ApiClient, mirror: &mut Mirror, index: usize) -> Result<()> {
    let current = mirror.store.group_goal_at_index(index)?.complete();
    let group_goal_id = mirror.group_goal_id_at(index)?;
    let response = api.patch(
        &format!("group-goals/{group_goal_id}/"),
        &json!({ "complete": !current }),
    )?;
    if response.status != 200 {
        return Err(response.into_remote_error());
    }
    apply_toggled(mirror, index, &response.body)
}

pub fn apply_toggled(mirror: &mut Mirror, index: usize, body: &Value) -> Result<()> {
    let payload: GroupGoalPayload = serde_json::from_value(body.clone())
        .map_err(|e| Error::validation("group_goal", format!("unexpected update response: {e}")))?;
    let updated = GroupGoal::from_payload(payload)?;
    mirror.replace_group_goal(index, updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::{goals, groups};
    use serde_json::json;

    fn seeded_mirror() -> Mirror {
        let mut mirror = Mirror::new();
        groups::apply_created(&mut mirror, &json!({"name": "Alpha", "topic": 1, "id": 1}))
            .unwrap();
        goals::apply_created(
            &mut mirror,
            &json!({"title": "Write tests", "description": "", "points": 3, "id": 2}),
        )
        .unwrap();
        apply_created(
            &mut mirror,
            &json!({"group": 1, "goal": 2, "complete": false, "id": 30}),
        )
        .unwrap();
        mirror
    }

    #[test]
    fn listing_resolves_names_by_remote_id() {
        let mirror = seeded_mirror();
        let mut out = Vec::new();
        render(&mirror, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Alpha"));
        assert!(text.contains("Write tests"));
        assert!(text.contains("no"));
    }

    #[test]
    fn listing_falls_back_to_unknown() {
        let mut mirror = Mirror::new();
        apply_created(&mut mirror, &json!({"group": 9, "goal": 9, "id": 1})).unwrap();
        let mut out = Vec::new();
        render(&mirror, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Unknown"));
    }

    #[test]
    fn apply_toggled_replaces_in_place() {
        let mut mirror = seeded_mirror();
        apply_created(
            &mut mirror,
            &json!({"group": 1, "goal": 2, "complete": false, "id": 31}),
        )
        .unwrap();

        apply_toggled(
            &mut mirror,
            0,
            &json!({"group": 1, "goal": 2, "complete": true, "id": 30}),
        )
        .unwrap();

        assert!(mirror.store.group_goal_at_index(0).unwrap().complete());
        assert!(!mirror.store.group_goal_at_index(1).unwrap().complete());
        // Ordering and id mapping are untouched.
        assert_eq!(mirror.group_goal_id_at(0).unwrap(), 30);
        assert_eq!(mirror.group_goal_id_at(1).unwrap(), 31);
    }

    #[test]
    fn apply_toggled_rejects_bad_rows() {
        let mut mirror = seeded_mirror();
        assert!(apply_toggled(&mut mirror, 0, &json!({"complete": true})).is_err());
        assert!(!mirror.store.group_goal_at_index(0).unwrap().complete());
    }
}
