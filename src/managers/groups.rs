// Group CRUD plus membership: any authenticated user can join or leave a
// group, staff can add, remove and sort. The listing marks the groups the
// current user belongs to.

use std::io::Write;

use serde_json::Value;

use crate::api::ApiClient;
use crate::domain::entities::{GroupProject, GroupProjectPayload};
use crate::domain::values::{GroupName, Link};
use crate::error::{Error, Result};
use crate::mirror::Mirror;
use crate::ui;

pub fn render(mirror: &Mirror, out: &mut impl Write) -> std::io::Result<()> {
    let rule = "-".repeat(120);
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "{:>3} {:<2} {:<30} {:>8} {:<25} {:<25} {:<25}",
        "Idx", "", "NAME", "TOPIC_ID", "LINK_DJANGO", "LINK_TUI", "LINK_GUI"
    )?;
    writeln!(out, "{rule}")?;
    for index in 0..mirror.store.number_of_groups() {
        if let Ok(group) = mirror.store.group_at_index(index) {
            let joined = group
                .id()
                .map_or(false, |id| mirror.user_groups.contains(&id));
            writeln!(
                out,
                "{:>3} {:<2} {:<30} {:>8} {:<25} {:<25} {:<25}",
                index + 1,
                if joined { "*" } else { "" },
                ui::clip(group.name().as_str(), 30),
                group.topic_id(),
                ui::clip(group.link_django().as_str(), 25),
                ui::clip(group.link_tui().as_str(), 25),
                ui::clip(group.link_gui().as_str(), 25)
            )?;
        }
    }
    writeln!(out, "{rule}")
}

fn read_link(prompt: &str) -> anyhow::Result<Link> {
    ui::read_value(prompt, |s| {
        if s.is_empty() {
            Ok(Link::empty())
        } else {
            Link::new(s)
        }
    })
}

fn read_group() -> anyhow::Result<GroupProject> {
    let name = ui::read_value("Group Name", |s| GroupName::new(s))?;
    let topic_id = ui::read_value("Topic ID", |s| ui::parse_remote_id("topic_id", s))?;
    let link_django = read_link("Link Django (optional)")?;
    let link_tui = read_link("Link TUI (optional)")?;
    let link_gui = read_link("Link GUI (optional)")?;
    Ok(GroupProject::new(
        name, topic_id, link_django, link_tui, link_gui,
    )?)
}

pub fn add_group(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let group = read_group()?;
    create(api, mirror, &group)?;
    writeln!(out, "Group added!")?;
    Ok(())
}

pub fn create(api: &ApiClient, mirror: &mut Mirror, group: &GroupProject) -> Result<()> {
    let body = serde_json::to_value(group.to_payload())
        .map_err(|e| Error::validation("group", e.to_string()))?;
    let response = api.post("groups/", &body)?;
    if response.status != 201 {
        return Err(response.into_remote_error());
    }
    apply_created(mirror, &response.body)
}

pub fn apply_created(mirror: &mut Mirror, body: &Value) -> Result<()> {
    let payload: GroupProjectPayload = serde_json::from_value(body.clone())
        .map_err(|e| Error::validation("group", format!("unexpected create response: {e}")))?;
    let group = GroupProject::from_payload(payload)?;
    let id = group
        .id()
        .ok_or_else(|| Error::validation("group", "create response carries no id"))?;
    mirror.push_group(group, id);
    Ok(())
}

pub fn remove_group(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let index = match ui::read_index("Enter index (0 to cancel)", mirror.store.number_of_groups())?
    {
        Some(index) => index,
        None => {
            writeln!(out, "Cancelled!")?;
            return Ok(());
        }
    };
    remove(api, mirror, index)?;
    writeln!(out, "Group removed!")?;
    Ok(())
}

pub fn remove(api: &ApiClient, mirror: &mut Mirror, index: usize) -> Result<()> {
    let group_id = mirror.group_id_at(index)?;
    let response = api.delete(&format!("groups/{group_id}/"))?;
    if response.status != 204 {
        return Err(response.into_remote_error());
    }
    mirror.remove_group(index)?;
    mirror.user_groups.remove(&group_id);
    Ok(())
}

pub fn join_group(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let index = match ui::read_index(
        "Enter group index to join (0 to cancel)",
        mirror.store.number_of_groups(),
    )? {
        Some(index) => index,
        None => {
            writeln!(out, "Cancelled!")?;
            return Ok(());
        }
    };
    let group_id = mirror.group_id_at(index)?;
    let response = api.post_empty(&format!("groups/{group_id}/join/"))?;
    if response.status != 200 && response.status != 201 {
        return Err(response.into_remote_error().into());
    }
    mirror.user_groups.insert(group_id);
    writeln!(out, "Joined group successfully!")?;
    Ok(())
}

pub fn leave_group(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let index = match ui::read_index(
        "Enter group index to leave (0 to cancel)",
        mirror.store.number_of_groups(),
    )? {
        Some(index) => index,
        None => {
            writeln!(out, "Cancelled!")?;
            return Ok(());
        }
    };
    let group_id = mirror.group_id_at(index)?;
    let response = api.delete(&format!("groups/{group_id}/leave/"))?;
    if response.status != 204 {
        return Err(response.into_remote_error().into());
    }
    mirror.user_groups.remove(&group_id);
    writeln!(out, "Left group successfully!")?;
    Ok(())
}

pub fn sort_groups(mirror: &mut Mirror, out: &mut impl Write) -> anyhow::Result<()> {
    mirror.sort_groups_by_name();
    writeln!(out, "Groups sorted by name!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded_mirror() -> Mirror {
        let mut mirror = Mirror::new();
        for (name, id) in [("Alpha", 1), ("Beta", 2), ("Gamma", 3)] {
            apply_created(
                &mut mirror,
                &json!({"name": name, "topic": 1, "id": id}),
            )
            .unwrap();
        }
        mirror
    }

    #[test]
    fn apply_created_records_index_to_id() {
        let mirror = seeded_mirror();
        assert_eq!(mirror.store.number_of_groups(), 3);
        assert_eq!(mirror.group_id_at(2).unwrap(), 3);
    }

    #[test]
    fn render_marks_joined_groups() {
        let mut mirror = seeded_mirror();
        mirror.user_groups.insert(2);
        let mut out = Vec::new();
        render(&mirror, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let beta_line = text.lines().find(|l| l.contains("Beta")).unwrap();
        assert!(beta_line.contains('*'));
        let alpha_line = text.lines().find(|l| l.contains("Alpha")).unwrap();
        assert!(!alpha_line.contains('*'));
    }
}
