//! # Inheritance Assembly
//!
//! Single-inheritance field merge. [`assemble`] folds a parent descriptor into
//! a child descriptor in place, following these rules:
//!
//! - **Scalars** (`groupId`, `version`, `name`, `description`, `url`,
//!   `build.finalName`): inherited only when unset in the child.
//! - **Never inherited**: `artifactId`, `packaging`, `parent`, `modules`.
//! - **Maps** (`properties`, plugin `configuration`): overlaid, the child's
//!   entry wins on key collision.
//! - **Keyed sequences**: merged by key, the child's entry wins on collision.
//!   Each field declares its [`ListOrder`]: plugins and plugin executions keep
//!   the parent's entries first, dependencies and repositories keep the
//!   child's entries first.
//! - Plugins declared with `inherited: false` stay with the parent.
//!
//! The same function serves regular parent inheritance and fragment
//! composition; in the latter case the fragment plays the parent.

use std::collections::{HashMap, HashSet};

use crate::descriptor::{BuildDescriptor, Dependency, Plugin, PluginExecution, Repository};
use crate::problems::ProblemCollector;

/// Position of inherited entries in a merged sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Parent entries first, child-only entries appended
    ParentFirst,
    /// Child entries first, parent-only entries appended
    ChildFirst,
}

const PLUGIN_ORDER: ListOrder = ListOrder::ParentFirst;
const EXECUTION_ORDER: ListOrder = ListOrder::ParentFirst;
const DEPENDENCY_ORDER: ListOrder = ListOrder::ChildFirst;
const REPOSITORY_ORDER: ListOrder = ListOrder::ChildFirst;

/// Merge `parent` into `child`
///
/// Problems with the parent itself are recorded in `problems`; the merge is
/// still carried out so that every problem surfaces in one report.
pub fn assemble(child: &mut BuildDescriptor, parent: &BuildDescriptor, problems: &mut ProblemCollector) {
    validate_parent(parent, problems);

    inherit(&mut child.group_id, &parent.group_id);
    inherit(&mut child.version, &parent.version);
    inherit(&mut child.name, &parent.name);
    inherit(&mut child.description, &parent.description);
    inherit(&mut child.url, &parent.url);
    inherit(&mut child.build.final_name, &parent.build.final_name);

    for (key, value) in &parent.properties {
        child
            .properties
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }

    child.dependency_management = merge_keyed(
        &child.dependency_management,
        &parent.dependency_management,
        DEPENDENCY_ORDER,
        Dependency::management_key,
        |_, _| {},
    );
    child.dependencies = merge_keyed(
        &child.dependencies,
        &parent.dependencies,
        DEPENDENCY_ORDER,
        Dependency::management_key,
        |_, _| {},
    );
    child.repositories = merge_keyed(
        &child.repositories,
        &parent.repositories,
        REPOSITORY_ORDER,
        |repository: &Repository| repository.id.clone(),
        |_, _| {},
    );

    let inheritable: Vec<Plugin> = parent
        .build
        .plugins
        .iter()
        .filter(|plugin| plugin.inherited)
        .cloned()
        .collect();
    child.build.plugins = merge_keyed(
        &child.build.plugins,
        &inheritable,
        PLUGIN_ORDER,
        Plugin::key,
        merge_plugin,
    );
}

fn validate_parent(parent: &BuildDescriptor, problems: &mut ProblemCollector) {
    if parent.artifact_id.as_deref().map_or(true, str::is_empty) {
        problems.fatal("'artifactId' is missing in the inherited descriptor");
    }
    match parent.packaging.as_deref() {
        None | Some("pom") => {}
        Some(other) => problems.error(format!(
            "Invalid packaging for inherited descriptor {}, must be \"pom\" but is \"{}\"",
            parent.gav(),
            other
        )),
    }
}

fn inherit<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if target.is_none() {
        *target = source.clone();
    }
}

fn merge_plugin(child: &mut Plugin, parent: &Plugin) {
    inherit(&mut child.version, &parent.version);
    for (key, value) in &parent.configuration {
        child
            .configuration
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
    child.executions = merge_keyed(
        &child.executions,
        &parent.executions,
        EXECUTION_ORDER,
        |execution: &PluginExecution| execution.id.clone(),
        |_, _| {},
    );
}

/// Merge two keyed sequences, the child's entry winning on collision
///
/// `merge_entry` folds the parent's entry into the child's when both exist.
/// Child entries sharing a key are all kept, in declaration order, under
/// either [`ListOrder`].
fn merge_keyed<T, K, M>(child: &[T], parent: &[T], order: ListOrder, key: K, merge_entry: M) -> Vec<T>
where
    T: Clone,
    K: Fn(&T) -> String,
    M: Fn(&mut T, &T),
{
    let parent_by_key: HashMap<String, &T> = parent.iter().map(|p| (key(p), p)).collect();
    let mut child_by_key: HashMap<String, Vec<&T>> = HashMap::new();
    for entry in child {
        child_by_key.entry(key(entry)).or_default().push(entry);
    }

    let merged_child = |entry: &T| {
        let mut merged = entry.clone();
        if let Some(&parent_entry) = parent_by_key.get(&key(entry)) {
            merge_entry(&mut merged, parent_entry);
        }
        merged
    };

    let mut result = Vec::with_capacity(child.len() + parent.len());
    match order {
        ListOrder::ChildFirst => {
            result.extend(child.iter().map(merged_child));
            result.extend(
                parent
                    .iter()
                    .filter(|&p| !child_by_key.contains_key(&key(p)))
                    .cloned(),
            );
        }
        ListOrder::ParentFirst => {
            let mut placed = HashSet::new();
            for parent_entry in parent {
                let parent_key = key(parent_entry);
                match child_by_key.get(&parent_key) {
                    Some(entries) => {
                        if placed.insert(parent_key) {
                            result.extend(entries.iter().map(|&entry| merged_child(entry)));
                        }
                    }
                    None => result.push(parent_entry.clone()),
                }
            }
            result.extend(
                child
                    .iter()
                    .filter(|&c| !parent_by_key.contains_key(&key(c)))
                    .map(merged_child),
            );
        }
    }
    result
}
