// Goal CRUD: tabular listing, staff add/remove, sort by points. The
// response-application half is separated from the prompting half so the
// create/delete bookkeeping can be exercised without a server.

use std::io::Write;

use serde_json::Value;

use crate::api::ApiClient;
use crate::domain::entities::{Goal, GoalPayload};
use crate::domain::store::Gpm;
use crate::domain::values::{GoalDescription, GoalTitle, Points};
use crate::error::{Error, Result};
use crate::mirror::Mirror;
use crate::ui;

pub fn render(store: &Gpm, out: &mut impl Write) -> std::io::Result<()> {
    let rule = "-".repeat(100);
    writeln!(out, "{rule}")?;
    writeln!(out, "{:>3} {:<30} {:<50} {:>6}", "Idx", "TITLE", "DESCRIPTION", "POINTS")?;
    writeln!(out, "{rule}")?;
    for index in 0..store.number_of_goals() {
        if let Ok(goal) = store.goal_at_index(index) {
            writeln!(
                out,
                "{:>3} {:<30} {:<50} {:>6}",
                index + 1,
                ui::clip(goal.title().as_str(), 30),
                ui::clip(goal.description().as_str(), 50),
                goal.points().value()
            )?;
        }
    }
    writeln!(out, "{rule}")
}

fn read_goal() -> anyhow::Result<Goal> {
    let title = ui::read_value("Goal Title", |s| GoalTitle::new(s))?;
    let description = ui::read_value("Goal Description", |s| GoalDescription::new(s))?;
    let points = ui::read_value("Points (1-5)", Points::parse)?;
    Ok(Goal::new(title, description, points))
}

pub fn add_goal(api: &ApiClient, mirror: &mut Mirror, out: &mut impl Write) -> anyhow::Result<()> {
    let goal = read_goal()?;
    create(api, mirror, &goal)?;
    writeln!(out, "Goal added!")?;
    Ok(())
}

/// POST the goal; on 201 mirror the server's copy (which carries the id).
pub fn create(api: &ApiClient, mirror: &mut Mirror, goal: &Goal) -> Result<()> {
    let body = serde_json::to_value(goal.to_payload())
        .map_err(|e| Error::validation("goal", e.to_string()))?;
    let response = api.post("goals/", &body)?;
    if response.status != 201 {
        return Err(response.into_remote_error());
    }
    apply_created(mirror, &response.body)
}

/// Record a confirmed creation: parse the server's row, append it and map
/// the new index to the assigned id.
pub fn apply_created(mirror: &mut Mirror, body: &Value) -> Result<()> {
    let payload: GoalPayload = serde_json::from_value(body.clone())
        .map_err(|e| Error::validation("goal", format!("unexpected create response: {e}")))?;
    let goal = Goal::from_payload(payload)?;
    let id = goal
        .id()
        .ok_or_else(|| Error::validation("goal", "create response carries no id"))?;
    mirror.push_goal(goal, id);
    Ok(())
}

pub fn remove_goal(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let index = match ui::read_index("Enter index (0 to cancel)", mirror.store.number_of_goals())? {
        Some(index) => index,
        None => {
            writeln!(out, "Cancelled!")?;
            return Ok(());
        }
    };
    remove(api, mirror, index)?;
    writeln!(out, "Goal removed!")?;
    Ok(())
}

/// DELETE by the remote id mapped at `index`; only a 204 touches the mirror.
pub fn remove(api: &ApiClient, mirror: &mut Mirror, index: usize) -> Result<()> {
    let goal_id = mirror.goal_id_at(index)?;
    let response = api.delete(&format!("goals/{goal_id}/"))?;
    if response.status != 204 {
        return Err(response.into_remote_error());
    }
    mirror.remove_goal(index)?;
    Ok(())
}

pub fn sort_goals(mirror: &mut Mirror, out: &mut impl Write) -> anyhow::Result<()> {
    mirror.sort_goals_by_points();
    writeln!(out, "Goals sorted by points!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apply_created_appends_and_maps_the_new_id() {
        let mut mirror = Mirror::new();
        let body = json!({"title": "Ship it", "description": "", "points": 4, "id": 7});
        apply_created(&mut mirror, &body).unwrap();
        assert_eq!(mirror.store.number_of_goals(), 1);
        assert_eq!(mirror.goal_id_at(0).unwrap(), 7);
        assert_eq!(mirror.store.goal_at_index(0).unwrap().id(), Some(7));
    }

    #[test]
    fn apply_created_rejects_invalid_rows() {
        let mut mirror = Mirror::new();
        assert!(apply_created(&mut mirror, &json!({"title": "x"})).is_err());
        assert!(apply_created(
            &mut mirror,
            &json!({"title": "x", "description": "", "points": 3})
        )
        .is_err());
        assert_eq!(mirror.store.number_of_goals(), 0);
    }

    #[test]
    fn render_lists_one_based_indexes() {
        let mut mirror = Mirror::new();
        apply_created(
            &mut mirror,
            &json!({"title": "Alpha", "description": "first", "points": 2, "id": 1}),
        )
        .unwrap();
        let mut out = Vec::new();
        render(&mirror.store, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Alpha"));
        assert!(text.contains("  1 "));
    }
}
