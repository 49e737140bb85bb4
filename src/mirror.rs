// Local-to-remote bookkeeping. `RemoteIndex` maps a position in one of the
// aggregate sequences to the id the server assigned that row. `Mirror` pairs
// the store with one index per resource kind and is the single place the
// lockstep invariant (same length, same order) is enforced: every push,
// removal, sort and clear goes through it.

use std::collections::{HashMap, HashSet};

use crate::domain::entities::{Goal, GroupGoal, GroupProject, Topic};
use crate::domain::store::Gpm;
use crate::error::{Error, Result};

/// Mapping from local index to server-assigned id for one resource kind.
#[derive(Debug, Default)]
pub struct RemoteIndex {
    ids: HashMap<usize, u64>,
}

impl RemoteIndex {
    pub fn new() -> Self {
        RemoteIndex::default()
    }

    pub fn set(&mut self, index: usize, remote_id: u64) {
        self.ids.insert(index, remote_id);
    }

    pub fn get(&self, index: usize) -> Result<u64> {
        self.ids
            .get(&index)
            .copied()
            .ok_or(Error::UnmappedIndex(index))
    }

    /// Drop the mapping at `index` and shift every surviving index above it
    /// down by one. A full O(n) rebuild; the mirror holds tens of entries.
    pub fn remove_and_renumber(&mut self, index: usize) {
        self.ids.remove(&index);
        let mut renumbered = HashMap::with_capacity(self.ids.len());
        for (&i, &id) in &self.ids {
            let new_index = if i > index { i - 1 } else { i };
            renumbered.insert(new_index, id);
        }
        self.ids = renumbered;
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The aggregate store plus its per-kind remote-id indexes and the current
/// user's group memberships.
#[derive(Debug, Default)]
pub struct Mirror {
    pub store: Gpm,
    groups_index: RemoteIndex,
    goals_index: RemoteIndex,
    topics_index: RemoteIndex,
    group_goals_index: RemoteIndex,
    pub user_groups: HashSet<u64>,
}

macro_rules! mirror_kind {
    ($push:ident, $remove:ident, $id_of:ident, $sort_sync:ident,
     $add:ident, $store_remove:ident, $count:ident, $at:ident, $index:ident, $entity:ty) => {
        /// Append an entity the server just confirmed, recording its id.
        pub fn $push(&mut self, entity: $entity, remote_id: u64) {
            self.store.$add(entity);
            self.$index.set(self.store.$count() - 1, remote_id);
        }

        /// Remove at `index` and renumber the id map in the same call.
        pub fn $remove(&mut self, index: usize) -> Result<$entity> {
            let removed = self.store.$store_remove(index)?;
            self.$index.remove_and_renumber(index);
            Ok(removed)
        }

        pub fn $id_of(&self, index: usize) -> Result<u64> {
            self.$index.get(index)
        }

        /// Rebuild the id map from the entities' own ids. Called after a
        /// sort reorders the sequence.
        fn $sort_sync(&mut self) {
            self.$index.clear();
            for i in 0..self.store.$count() {
                if let Ok(entity) = self.store.$at(i) {
                    if let Some(id) = entity.id() {
                        self.$index.set(i, id);
                    }
                }
            }
        }
    };
}

impl Mirror {
    pub fn new() -> Self {
        Mirror::default()
    }

    mirror_kind!(
        push_group, remove_group, group_id_at, sync_groups_index,
        add_group, remove_group, number_of_groups, group_at_index, groups_index, GroupProject
    );
    mirror_kind!(
        push_goal, remove_goal, goal_id_at, sync_goals_index,
        add_goal, remove_goal, number_of_goals, goal_at_index, goals_index, Goal
    );
    mirror_kind!(
        push_topic, remove_topic, topic_id_at, sync_topics_index,
        add_topic, remove_topic, number_of_topics, topic_at_index, topics_index, Topic
    );
    mirror_kind!(
        push_group_goal, remove_group_goal, group_goal_id_at, sync_group_goals_index,
        add_group_goal, remove_group_goal, number_of_group_goals, group_goal_at_index,
        group_goals_index, GroupGoal
    );

    pub fn sort_groups_by_name(&mut self) {
        self.store.sort_groups_by_name();
        self.sync_groups_index();
    }

    pub fn sort_goals_by_points(&mut self) {
        self.store.sort_goals_by_points();
        self.sync_goals_index();
    }

    pub fn sort_topics_by_title(&mut self) {
        self.store.sort_topics_by_title();
        self.sync_topics_index();
    }

    /// Replace the group-goal held at `index` without touching its id
    /// mapping. The toggle flow lands here: same row, new entity.
    pub fn replace_group_goal(&mut self, index: usize, group_goal: GroupGoal) -> Result<()> {
        self.store.replace_group_goal(index, group_goal)
    }

    /// Drop everything: store, id maps, memberships. Paired with logout.
    pub fn clear(&mut self) {
        self.store.clear_all();
        self.groups_index.clear();
        self.goals_index.clear();
        self.topics_index.clear();
        self.group_goals_index.clear();
        self.user_groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GoalPayload;

    fn goal(title: &str, points: i64, id: u64) -> Goal {
        Goal::from_payload(GoalPayload {
            title: title.into(),
            description: String::new(),
            points,
            id: Some(id),
        })
        .unwrap()
    }

    #[test]
    fn remote_index_get_fails_when_absent() {
        let mut index = RemoteIndex::new();
        assert!(matches!(index.get(0), Err(Error::UnmappedIndex(0))));
        index.set(0, 42);
        assert_eq!(index.get(0).unwrap(), 42);
    }

    #[test]
    fn remove_and_renumber_shifts_higher_indices_down() {
        let mut index = RemoteIndex::new();
        index.set(0, 10);
        index.set(1, 11);
        index.set(2, 12);
        index.remove_and_renumber(1);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0).unwrap(), 10);
        assert_eq!(index.get(1).unwrap(), 12);
        assert!(index.get(2).is_err());
    }

    #[test]
    fn mirror_push_records_index_to_id() {
        let mut mirror = Mirror::new();
        mirror.push_goal(goal("a", 3, 7), 7);
        assert_eq!(mirror.store.number_of_goals(), 1);
        assert_eq!(mirror.goal_id_at(0).unwrap(), 7);
    }

    #[test]
    fn mirror_remove_keeps_surviving_ids_in_lockstep() {
        let mut mirror = Mirror::new();
        for (i, t) in ["a", "b", "c"].iter().enumerate() {
            let id = 100 + i as u64;
            mirror.push_goal(goal(t, 2, id), id);
        }
        mirror.remove_goal(1).unwrap();
        assert_eq!(mirror.store.number_of_goals(), 2);
        assert_eq!(mirror.goal_id_at(0).unwrap(), 100);
        assert_eq!(mirror.goal_id_at(1).unwrap(), 102);
        assert!(mirror.goal_id_at(2).is_err());
    }

    #[test]
    fn mirror_remove_out_of_range_leaves_map_untouched() {
        let mut mirror = Mirror::new();
        mirror.push_goal(goal("a", 2, 5), 5);
        assert!(mirror.remove_goal(3).is_err());
        assert_eq!(mirror.goal_id_at(0).unwrap(), 5);
    }

    #[test]
    fn sort_resyncs_the_id_map() {
        let mut mirror = Mirror::new();
        mirror.push_goal(goal("low", 1, 11), 11);
        mirror.push_goal(goal("high", 5, 55), 55);
        mirror.sort_goals_by_points();
        assert_eq!(mirror.store.goal_at_index(0).unwrap().points().value(), 5);
        assert_eq!(mirror.goal_id_at(0).unwrap(), 55);
        assert_eq!(mirror.goal_id_at(1).unwrap(), 11);
    }

    #[test]
    fn clear_drops_store_ids_and_memberships() {
        let mut mirror = Mirror::new();
        mirror.push_goal(goal("a", 2, 9), 9);
        mirror.user_groups.insert(4);
        mirror.clear();
        assert_eq!(mirror.store.number_of_goals(), 0);
        assert!(mirror.goal_id_at(0).is_err());
        assert!(mirror.user_groups.is_empty());
    }
}
