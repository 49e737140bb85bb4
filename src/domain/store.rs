// In-memory aggregate store: the local mirror of what the server holds for
// the current session. Four insertion-ordered sequences with bounds-checked
// index access. The store knows nothing about remote ids; that bookkeeping
// lives in `mirror::RemoteIndex` and is the caller's job to keep in step.

use crate::domain::entities::{Goal, GroupGoal, GroupProject, Topic};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct Gpm {
    groups: Vec<GroupProject>,
    goals: Vec<Goal>,
    topics: Vec<Topic>,
    group_goals: Vec<GroupGoal>,
}

fn at<T>(items: &[T], index: usize) -> Result<&T> {
    items.get(index).ok_or(Error::IndexOutOfRange {
        index,
        len: items.len(),
    })
}

fn check_bounds<T>(items: &[T], index: usize) -> Result<()> {
    if index >= items.len() {
        return Err(Error::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(())
}

impl Gpm {
    pub fn new() -> Self {
        Gpm::default()
    }

    // ----- groups -----

    pub fn number_of_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn group_at_index(&self, index: usize) -> Result<&GroupProject> {
        at(&self.groups, index)
    }

    pub fn add_group(&mut self, group: GroupProject) {
        self.groups.push(group);
    }

    pub fn remove_group(&mut self, index: usize) -> Result<GroupProject> {
        check_bounds(&self.groups, index)?;
        Ok(self.groups.remove(index))
    }

    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    pub fn sort_groups_by_name(&mut self) {
        self.groups.sort_by(|a, b| a.name().cmp(b.name()));
    }

    // ----- goals -----

    pub fn number_of_goals(&self) -> usize {
        self.goals.len()
    }

    pub fn goal_at_index(&self, index: usize) -> Result<&Goal> {
        at(&self.goals, index)
    }

    pub fn add_goal(&mut self, goal: Goal) {
        self.goals.push(goal);
    }

    pub fn remove_goal(&mut self, index: usize) -> Result<Goal> {
        check_bounds(&self.goals, index)?;
        Ok(self.goals.remove(index))
    }

    pub fn clear_goals(&mut self) {
        self.goals.clear();
    }

    /// Highest-weighted goals first; ties keep their relative order.
    pub fn sort_goals_by_points(&mut self) {
        self.goals.sort_by(|a, b| b.points().cmp(&a.points()));
    }

    // ----- topics -----

    pub fn number_of_topics(&self) -> usize {
        self.topics.len()
    }

    pub fn topic_at_index(&self, index: usize) -> Result<&Topic> {
        at(&self.topics, index)
    }

    pub fn add_topic(&mut self, topic: Topic) {
        self.topics.push(topic);
    }

    pub fn remove_topic(&mut self, index: usize) -> Result<Topic> {
        check_bounds(&self.topics, index)?;
        Ok(self.topics.remove(index))
    }

    pub fn clear_topics(&mut self) {
        self.topics.clear();
    }

    pub fn sort_topics_by_title(&mut self) {
        self.topics.sort_by(|a, b| a.title().cmp(b.title()));
    }

    // ----- group goals -----

    pub fn number_of_group_goals(&self) -> usize {
        self.group_goals.len()
    }

    pub fn group_goal_at_index(&self, index: usize) -> Result<&GroupGoal> {
        at(&self.group_goals, index)
    }

    pub fn add_group_goal(&mut self, group_goal: GroupGoal) {
        self.group_goals.push(group_goal);
    }

    pub fn remove_group_goal(&mut self, index: usize) -> Result<GroupGoal> {
        check_bounds(&self.group_goals, index)?;
        Ok(self.group_goals.remove(index))
    }

    /// In-place update of the entity held at `index`. Used for the
    /// completion toggle, which must not disturb ordering.
    pub fn replace_group_goal(&mut self, index: usize, group_goal: GroupGoal) -> Result<()> {
        check_bounds(&self.group_goals, index)?;
        self.group_goals[index] = group_goal;
        Ok(())
    }

    pub fn clear_group_goals(&mut self) {
        self.group_goals.clear();
    }

    pub fn clear_all(&mut self) {
        self.clear_groups();
        self.clear_goals();
        self.clear_topics();
        self.clear_group_goals();
    }
}
