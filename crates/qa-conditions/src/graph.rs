use std::collections::{BTreeSet, HashMap};

use crate::spec::question::QuestionSpec;

/// Reverse index from a question to the questions whose conditions read its
/// answer.
///
/// Questions are stored by position; edges only exist between known
/// questions, so conditions referencing missing ids contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Builds the graph. If an id appears more than once, the first position
    /// is kept and only the last definition's conditions contribute edges.
    pub fn build(questions: &[QuestionSpec]) -> Self {
        let mut graph = Self::default();
        let mut definitions: Vec<&QuestionSpec> = Vec::new();
        for question in questions {
            match graph.index.get(&question.id) {
                Some(&slot) => definitions[slot] = question,
                None => {
                    graph.index.insert(question.id.clone(), graph.ids.len());
                    graph.ids.push(question.id.clone());
                    graph.dependents.push(Vec::new());
                    definitions.push(question);
                }
            }
        }

        for (dependent, question) in definitions.into_iter().enumerate() {
            for condition in &question.conditions {
                let Some(&source) = graph.index.get(&condition.question_id) else {
                    continue;
                };
                let edges = &mut graph.dependents[source];
                if !edges.contains(&dependent) {
                    edges.push(dependent);
                }
            }
        }

        graph
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Questions with at least one condition referencing `id`.
    pub fn direct_dependents(&self, id: &str) -> Vec<&str> {
        self.slot(id)
            .map(|slot| {
                self.dependents[slot]
                    .iter()
                    .map(|&dependent| self.ids[dependent].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Transitive closure of the questions whose state may change when the
    /// answer to `id` changes. Never contains `id` itself.
    pub fn dependents(&self, id: &str) -> BTreeSet<String> {
        self.slot(id)
            .map(|slot| {
                self.closure(slot)
                    .into_iter()
                    .map(|dependent| self.ids[dependent].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ids of questions that can reach themselves along dependency edges.
    pub fn cycles(&self) -> Vec<String> {
        (0..self.ids.len())
            .filter(|&slot| self.reaches(slot, slot))
            .map(|slot| self.ids[slot].clone())
            .collect()
    }

    pub(crate) fn slot(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Worklist traversal; the visited set is seeded with `start` so cycles
    /// terminate and the start is never reported as its own dependent.
    pub(crate) fn closure(&self, start: usize) -> Vec<usize> {
        let mut visited = vec![false; self.ids.len()];
        visited[start] = true;
        let mut pending = vec![start];
        let mut reached = Vec::new();

        while let Some(slot) = pending.pop() {
            for &dependent in &self.dependents[slot] {
                if !visited[dependent] {
                    visited[dependent] = true;
                    reached.push(dependent);
                    pending.push(dependent);
                }
            }
        }

        reached
    }

    fn reaches(&self, start: usize, target: usize) -> bool {
        let mut visited = vec![false; self.ids.len()];
        let mut pending = vec![start];

        while let Some(slot) = pending.pop() {
            for &dependent in &self.dependents[slot] {
                if dependent == target {
                    return true;
                }
                if !visited[dependent] {
                    visited[dependent] = true;
                    pending.push(dependent);
                }
            }
        }

        false
    }
}
