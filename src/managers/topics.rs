// Topic CRUD. Same shape as goals: listing, staff add/remove, sort by
// title.

use std::io::Write;

use serde_json::Value;

use crate::api::ApiClient;
use crate::domain::entities::{Topic, TopicPayload};
use crate::domain::store::Gpm;
use crate::domain::values::TopicTitle;
use crate::error::{Error, Result};
use crate::mirror::Mirror;
use crate::ui;

pub fn render(store: &Gpm, out: &mut impl Write) -> std::io::Result<()> {
    let rule = "-".repeat(60);
    writeln!(out, "{rule}")?;
    writeln!(out, "{:>3} {:<50}", "Idx", "TITLE")?;
    writeln!(out, "{rule}")?;
    for index in 0..store.number_of_topics() {
        if let Ok(topic) = store.topic_at_index(index) {
            writeln!(
                out,
                "{:>3} {:<50}",
                index + 1,
                ui::clip(topic.title().as_str(), 50)
            )?;
        }
    }
    writeln!(out, "{rule}")
}

pub fn add_topic(api: &ApiClient, mirror: &mut Mirror, out: &mut impl Write) -> anyhow::Result<()> {
    let title = ui::read_value("Topic Title", |s| TopicTitle::new(s))?;
    create(api, mirror, &Topic::new(title))?;
    writeln!(out, "Topic added!")?;
    Ok(())
}

pub fn create(api: &ApiClient, mirror: &mut Mirror, topic: &Topic) -> Result<()> {
    let body = serde_json::to_value(topic.to_payload())
        .map_err(|e| Error::validation("topic", e.to_string()))?;
    let response = api.post("topics/", &body)?;
    if response.status != 201 {
        return Err(response.into_remote_error());
    }
    apply_created(mirror, &response.body)
}

pub fn apply_created(mirror: &mut Mirror, body: &Value) -> Result<()> {
    let payload: TopicPayload = serde_json::from_value(body.clone())
        .map_err(|e| Error::validation("topic", format!("unexpected create response: {e}")))?;
    let topic = Topic::from_payload(payload)?;
    let id = topic
        .id()
        .ok_or_else(|| Error::validation("topic", "create response carries no id"))?;
    mirror.push_topic(topic, id);
    Ok(())
}

pub fn remove_topic(
    api: &ApiClient,
    mirror: &mut Mirror,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let index = match ui::read_index("Enter index (0 to cancel)", mirror.store.number_of_topics())?
    {
        Some(index) => index,
        None => {
            writeln!(out, "Cancelled!")?;
            return Ok(());
        }
    };
    remove(api, mirror, index)?;
    writeln!(out, "Topic removed!")?;
    Ok(())
}

pub fn remove(api: &ApiClient, mirror: &mut Mirror, index: usize) -> Result<()> {
    let topic_id = mirror.topic_id_at(index)?;
    let response = api.delete(&format!("topics/{topic_id}/"))?;
    if response.status != 204 {
        return Err(response.into_remote_error());
    }
    mirror.remove_topic(index)?;
    Ok(())
}

pub fn sort_topics(mirror: &mut Mirror, out: &mut impl Write) -> anyhow::Result<()> {
    mirror.sort_topics_by_title();
    writeln!(out, "Topics sorted by title!")?;
    Ok(())
}
