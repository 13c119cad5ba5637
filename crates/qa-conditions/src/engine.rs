use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::answers::{Response, ResponseMap, responses_from_answers};
use crate::diagnostics::Diagnostic;
use crate::evaluate::{Evaluation, evaluate, is_empty_value};
use crate::graph::DependencyGraph;
use crate::spec::form::FormSpec;
use crate::spec::question::{Action, Operand, Operator, QuestionSpec};
use crate::state::QuestionState;

/// Cache counters, mostly useful to confirm that queries are served from the
/// cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Per-field caches indexed by question position.
#[derive(Debug, Clone)]
struct StateCache {
    visible: Vec<Option<bool>>,
    required: Vec<Option<bool>>,
    disabled: Vec<Option<bool>>,
}

impl StateCache {
    fn new(len: usize) -> Self {
        Self {
            visible: vec![None; len],
            required: vec![None; len],
            disabled: vec![None; len],
        }
    }

    fn get(&self, slot: usize) -> Option<QuestionState> {
        Some(QuestionState {
            visible: self.visible[slot]?,
            required: self.required[slot]?,
            disabled: self.disabled[slot]?,
        })
    }

    fn store(&mut self, slot: usize, state: QuestionState) {
        self.visible[slot] = Some(state.visible);
        self.required[slot] = Some(state.required);
        self.disabled[slot] = Some(state.disabled);
    }

    fn invalidate(&mut self, slot: usize) {
        self.visible[slot] = None;
        self.required[slot] = None;
        self.disabled[slot] = None;
    }
}

/// Resolves visibility, requirement and enablement for every question of a
/// form from a snapshot of the answers.
///
/// State is computed lazily and cached per question. [`update_response`]
/// invalidates only the updated question and its transitive dependents.
///
/// [`update_response`]: ConditionEngine::update_response
#[derive(Debug, Clone)]
pub struct ConditionEngine {
    questions: Vec<QuestionSpec>,
    responses: ResponseMap,
    graph: DependencyGraph,
    cache: StateCache,
    stats: CacheStats,
    diagnostics: Vec<Diagnostic>,
}

impl ConditionEngine {
    pub fn new(questions: impl IntoIterator<Item = QuestionSpec>, responses: ResponseMap) -> Self {
        let mut arena: Vec<QuestionSpec> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut diagnostics = Vec::new();

        for question in questions {
            match positions.get(&question.id) {
                Some(&slot) => {
                    diagnostics.push(Diagnostic::DuplicateQuestion {
                        id: question.id.clone(),
                    });
                    arena[slot] = question;
                }
                None => {
                    positions.insert(question.id.clone(), arena.len());
                    arena.push(question);
                }
            }
        }

        for question in &arena {
            for condition in &question.conditions {
                if !positions.contains_key(&condition.question_id) {
                    diagnostics.push(Diagnostic::MissingReference {
                        question_id: question.id.clone(),
                        referenced: condition.question_id.clone(),
                    });
                }
                if let Some(Operand::Invalid(operand)) = &condition.value {
                    diagnostics.push(Diagnostic::InvalidOperand {
                        question_id: question.id.clone(),
                        referenced: condition.question_id.clone(),
                        operand: operand.to_string(),
                    });
                }
                if let Action::Unknown(action) = &condition.action {
                    diagnostics.push(Diagnostic::UnknownAction {
                        question_id: question.id.clone(),
                        action: action.clone(),
                    });
                }
            }
        }

        let graph = DependencyGraph::build(&arena);
        diagnostics.extend(
            graph
                .cycles()
                .into_iter()
                .map(|id| Diagnostic::DependencyCycle { id }),
        );

        let mut engine = Self {
            cache: StateCache::new(arena.len()),
            questions: arena,
            responses,
            graph,
            stats: CacheStats::default(),
            diagnostics: Vec::new(),
        };
        for diagnostic in diagnostics {
            engine.report(diagnostic);
        }
        debug!(
            questions = engine.questions.len(),
            responses = engine.responses.len(),
            "condition engine indexed"
        );
        engine
    }

    /// Builds an engine from a form definition and a plain answers object.
    pub fn from_form(spec: &FormSpec, answers: &Value) -> Self {
        Self::new(spec.questions.iter().cloned(), responses_from_answers(answers))
    }

    /// Derived state of `question_id`; unknown ids get [`QuestionState::NEUTRAL`].
    pub fn question_state(&mut self, question_id: &str) -> QuestionState {
        match self.graph.slot(question_id) {
            Some(slot) => self.state_at(slot),
            None => {
                trace!(question_id, "state requested for unknown question");
                QuestionState::NEUTRAL
            }
        }
    }

    /// Ids of visible questions, in declaration order.
    pub fn visible_questions(&mut self) -> Vec<String> {
        let mut visible = Vec::new();
        for slot in 0..self.questions.len() {
            if self.state_at(slot).visible {
                visible.push(self.questions[slot].id.clone());
            }
        }
        visible
    }

    /// Derived state of every known question.
    pub fn states(&mut self) -> BTreeMap<String, QuestionState> {
        (0..self.questions.len())
            .map(|slot| (self.questions[slot].id.clone(), self.state_at(slot)))
            .collect()
    }

    /// Questions whose state may change when the answer to `question_id`
    /// changes.
    pub fn dependent_questions(&self, question_id: &str) -> BTreeSet<String> {
        self.graph.dependents(question_id)
    }

    /// Stores the engine's copy of the response and invalidates the question
    /// together with its dependents.
    pub fn update_response(&mut self, question_id: &str, response: Response) {
        self.responses.insert(question_id.to_string(), response);
        self.invalidate(question_id);
    }

    /// Removes the stored response, returning it if there was one.
    pub fn clear_response(&mut self, question_id: &str) -> Option<Response> {
        let removed = self.responses.remove(question_id);
        self.invalidate(question_id);
        removed
    }

    /// One line per condition of `question_id`, in declaration order, using
    /// the same evaluation as state resolution.
    pub fn evaluation_path(&mut self, question_id: &str) -> Vec<String> {
        let Some(slot) = self.graph.slot(question_id) else {
            return Vec::new();
        };
        let outcomes = self.evaluate_conditions(slot);
        self.questions[slot]
            .conditions
            .iter()
            .zip(outcomes)
            .map(|(condition, outcome)| {
                let operand = condition
                    .value
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "(none)".to_string());
                format!(
                    "\"{}\" {} {} -> {} ({})",
                    self.display_text(&condition.question_id),
                    condition.operator,
                    operand,
                    condition.action,
                    outcome.as_str()
                )
            })
            .collect()
    }

    /// Visible, enabled, required questions without a non-empty answer.
    pub fn missing_required(&mut self) -> Vec<String> {
        let mut missing = Vec::new();
        for slot in 0..self.questions.len() {
            let state = self.state_at(slot);
            if !state.visible || !state.required || state.disabled {
                continue;
            }
            let id = &self.questions[slot].id;
            if is_empty_value(self.responses.get(id).map(|response| &response.value)) {
                missing.push(id.clone());
            }
        }
        missing
    }

    /// Ids holding a response that no question in the form defines.
    pub fn unknown_responses(&self) -> Vec<String> {
        self.responses
            .keys()
            .filter(|id| !self.graph.contains(id))
            .cloned()
            .collect()
    }

    pub fn questions(&self) -> &[QuestionSpec] {
        &self.questions
    }

    pub fn response(&self, question_id: &str) -> Option<&Response> {
        self.responses.get(question_id)
    }

    pub fn responses(&self) -> &ResponseMap {
        &self.responses
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn state_at(&mut self, slot: usize) -> QuestionState {
        if let Some(state) = self.cache.get(slot) {
            self.stats.hits += 1;
            return state;
        }
        self.stats.misses += 1;

        let outcomes = self.evaluate_conditions(slot);
        let question = &self.questions[slot];
        let mut state = QuestionState::initial(question.required);
        for (condition, outcome) in question.conditions.iter().zip(outcomes) {
            state.apply(&condition.action, outcome.is_met());
        }

        trace!(question_id = %question.id, ?state, "resolved question state");
        self.cache.store(slot, state);
        state
    }

    fn evaluate_conditions(&mut self, slot: usize) -> Vec<Evaluation> {
        let question = &self.questions[slot];
        let outcomes: Vec<Evaluation> = question
            .conditions
            .iter()
            .map(|condition| evaluate(condition, self.referenced_value(&condition.question_id)))
            .collect();

        let unsupported: Vec<Diagnostic> = question
            .conditions
            .iter()
            .zip(&outcomes)
            .filter(|(condition, outcome)| {
                **outcome == Evaluation::Unsupported
                    && matches!(condition.operator, Operator::Unknown(_))
            })
            .map(|(condition, _)| Diagnostic::UnknownOperator {
                question_id: question.id.clone(),
                operator: condition.operator.to_string(),
            })
            .collect();
        for diagnostic in unsupported {
            self.report(diagnostic);
        }

        outcomes
    }

    /// Answers are only visible to conditions when they belong to a known
    /// question.
    fn referenced_value(&self, question_id: &str) -> Option<&Value> {
        if !self.graph.contains(question_id) {
            return None;
        }
        self.responses.get(question_id).map(|response| &response.value)
    }

    fn display_text<'a>(&'a self, question_id: &'a str) -> &'a str {
        self.graph
            .slot(question_id)
            .map(|slot| self.questions[slot].display_text())
            .unwrap_or(question_id)
    }

    fn invalidate(&mut self, question_id: &str) {
        let Some(slot) = self.graph.slot(question_id) else {
            trace!(question_id, "response recorded for unknown question");
            return;
        };
        self.cache.invalidate(slot);
        let dependents = self.graph.closure(slot);
        for &dependent in &dependents {
            self.cache.invalidate(dependent);
        }
        debug!(
            question_id,
            dependents = dependents.len(),
            "invalidated cached question state"
        );
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.contains(&diagnostic) {
            return;
        }
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}
