//! Grouping of the fetched user list
//!
//! Every grouping borrows from the user slice and keeps first-seen order for
//! keys and members alike. An absent attribute is the `None` key, and so is an
//! empty string: `""` and `null` share one group instead of producing two
//! identical `## ` headings.

use crate::graph::users::User;
use std::collections::HashMap;

/// Ordered mapping from an optional key to a value, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping<'a, T> {
    groups: Vec<(Option<&'a str>, T)>,
    index: HashMap<Option<&'a str>, usize>,
}

impl<T> Default for Grouping<'_, T> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<'a, T> Grouping<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, inserted with `T::default()` on first sight
    pub fn entry(&mut self, key: Option<&'a str>) -> &mut T
    where
        T: Default,
    {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.groups.push((key, T::default()));
                let idx = self.groups.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };
        &mut self.groups[idx].1
    }

    pub fn get(&self, key: Option<&str>) -> Option<&T> {
        self.index.get(&key).map(|&idx| &self.groups[idx].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = Option<&'a str>> + '_ {
        self.groups.iter().map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&'a str>, &T)> + '_ {
        self.groups.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Users sharing one attribute value
pub type UserGroups<'a> = Grouping<'a, Vec<&'a User>>;

/// Country, then city, then office location
pub type LocationGroups<'a> = Grouping<'a, Grouping<'a, UserGroups<'a>>>;

fn key_of(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Group users by the key `key` extracts
pub fn group_by<'a, F>(users: &'a [User], key: F) -> UserGroups<'a>
where
    F: Fn(&'a User) -> Option<&'a str>,
{
    let mut groups = UserGroups::new();
    for user in users {
        groups.entry(key(user)).push(user);
    }
    groups
}

pub fn by_department(users: &[User]) -> UserGroups<'_> {
    group_by(users, |u| key_of(&u.department))
}

pub fn by_job_title(users: &[User]) -> UserGroups<'_> {
    group_by(users, |u| key_of(&u.job_title))
}

pub fn by_office_location(users: &[User]) -> UserGroups<'_> {
    group_by(users, |u| key_of(&u.office_location))
}

pub fn by_location(users: &[User]) -> LocationGroups<'_> {
    let mut countries = LocationGroups::new();
    for user in users {
        countries
            .entry(key_of(&user.country))
            .entry(key_of(&user.city))
            .entry(key_of(&user.office_location))
            .push(user);
    }
    countries
}

/// Direct-report adjacency built from manager references
#[derive(Debug, Clone)]
pub struct ManagerTree<'a> {
    roots: Vec<&'a User>,
    reports: UserGroups<'a>,
}

impl<'a> ManagerTree<'a> {
    /// Users without a manager, in source order
    pub fn roots(&self) -> &[&'a User] {
        &self.roots
    }

    /// Direct reports of `manager_id`; empty when there are none
    pub fn reports_of(&self, manager_id: &str) -> &[&'a User] {
        self.reports
            .get(Some(manager_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub fn by_manager(users: &[User]) -> ManagerTree<'_> {
    let roots = users.iter().filter(|u| u.manager.is_none()).collect();

    let mut reports = UserGroups::new();
    for user in users {
        if let Some(manager_id) = user.manager_id() {
            reports.entry(Some(manager_id)).push(user);
        }
    }

    ManagerTree { roots, reports }
}
