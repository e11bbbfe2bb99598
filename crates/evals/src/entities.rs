//! The eleven evaluation entity types.
//!
//! Every type splits into *immutable properties* (fixed at creation,
//! including all foreign references) and *mutable properties* (editable any
//! number of times through the matching `…Update` payload). Foreign
//! references are plain id strings validated by the service at creation
//! time only — a delete never cascades, so a stored reference may dangle.
//!
//! Entity graph (arrows are required references):
//!
//! ```text
//! ModelClass  → ModelInstance ─┐
//! InputPayload ────────────────┼→ GenerationResult ─┐
//! TaskDefinition → TaskExample → ExampleLabel ──────┼→ ScoreResult
//! ScorerClass → ScorerInstance ─────────────────────┘
//!                       └──→ EvaluationSummary (← all of the above)
//! ```

use serde::{Deserialize, Serialize};

/// An entity type with a stable name used in error messages.
pub trait EvalEntity {
    /// The type name reported in `"<Type> <id> not found"` errors.
    const KIND: &'static str;
}

macro_rules! impl_entity {
    ($ty:ident) => {
        impl EvalEntity for $ty {
            const KIND: &'static str = stringify!($ty);
        }
    };
}

// ============================================================================
// Models
// ============================================================================

/// A family of models (e.g. one provider's chat model line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelClass {
    /// Generated unique id
    pub id: String,
    /// Class name (immutable)
    pub name: String,
    /// Provider name (immutable)
    pub provider: String,
    /// Free-form description (mutable)
    pub description: Option<String>,
}
impl_entity!(ModelClass);

/// Mutable properties of [`ModelClass`]. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelClassUpdate {
    /// New description, if present
    pub description: Option<String>,
}

impl ModelClassUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut ModelClass) {
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
    }
}

/// A concrete, parameterized version of a [`ModelClass`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInstance {
    /// Generated unique id
    pub id: String,
    /// Owning model class (immutable, required reference)
    pub model_class_id: String,
    /// Version label within the class (immutable)
    pub version_tag: String,
    /// Sampling/config parameters (mutable)
    pub parameters: serde_json::Value,
    /// Free-form description (mutable)
    pub description: Option<String>,
}
impl_entity!(ModelInstance);

/// Mutable properties of [`ModelInstance`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInstanceUpdate {
    /// New parameters, if present
    pub parameters: Option<serde_json::Value>,
    /// New description, if present
    pub description: Option<String>,
}

impl ModelInstanceUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut ModelInstance) {
        if let Some(parameters) = &self.parameters {
            record.parameters = parameters.clone();
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
    }
}

// ============================================================================
// Inputs and generations
// ============================================================================

/// An input fed to a model (prompt, conversation, tool context).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPayload {
    /// Generated unique id
    pub id: String,
    /// The payload content (immutable)
    pub content: serde_json::Value,
    /// Annotation notes (mutable)
    pub notes: Option<String>,
}
impl_entity!(InputPayload);

/// Mutable properties of [`InputPayload`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputPayloadUpdate {
    /// New notes, if present
    pub notes: Option<String>,
}

impl InputPayloadUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut InputPayload) {
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
    }
}

/// One model output for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated unique id
    pub id: String,
    /// Producing model instance (immutable, required reference)
    pub model_instance_id: String,
    /// Input that produced this output (immutable, required reference)
    pub input_payload_id: String,
    /// The generated output (immutable)
    pub output: serde_json::Value,
    /// Observed generation latency (mutable; filled in post-hoc)
    pub latency_ms: Option<u64>,
    /// Annotation notes (mutable)
    pub notes: Option<String>,
}
impl_entity!(GenerationResult);

/// Mutable properties of [`GenerationResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResultUpdate {
    /// New latency, if present
    pub latency_ms: Option<u64>,
    /// New notes, if present
    pub notes: Option<String>,
}

impl GenerationResultUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut GenerationResult) {
        if let Some(latency_ms) = self.latency_ms {
            record.latency_ms = Some(latency_ms);
        }
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
    }
}

// ============================================================================
// Tasks and labels
// ============================================================================

/// A named evaluation task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Generated unique id
    pub id: String,
    /// Task name (immutable)
    pub name: String,
    /// Task description (mutable)
    pub description: Option<String>,
    /// Grading/solving instructions (mutable)
    pub instructions: Option<String>,
}
impl_entity!(TaskDefinition);

/// Mutable properties of [`TaskDefinition`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinitionUpdate {
    /// New description, if present
    pub description: Option<String>,
    /// New instructions, if present
    pub instructions: Option<String>,
}

impl TaskDefinitionUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut TaskDefinition) {
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
        if let Some(instructions) = &self.instructions {
            record.instructions = Some(instructions.clone());
        }
    }
}

/// One example belonging to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskExample {
    /// Generated unique id
    pub id: String,
    /// Owning task (immutable, required reference)
    pub task_definition_id: String,
    /// Input for this example (immutable, required reference)
    pub input_payload_id: String,
    /// Dataset split tag, e.g. "train"/"test" (mutable)
    pub split: Option<String>,
    /// Annotation notes (mutable)
    pub notes: Option<String>,
}
impl_entity!(TaskExample);

/// Mutable properties of [`TaskExample`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskExampleUpdate {
    /// New split tag, if present
    pub split: Option<String>,
    /// New notes, if present
    pub notes: Option<String>,
}

impl TaskExampleUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut TaskExample) {
        if let Some(split) = &self.split {
            record.split = Some(split.clone());
        }
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
    }
}

/// A ground-truth label for a task example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleLabel {
    /// Generated unique id
    pub id: String,
    /// Labeled example (immutable, required reference)
    pub task_example_id: String,
    /// The label payload (immutable)
    pub label: serde_json::Value,
    /// Annotation notes (mutable)
    pub notes: Option<String>,
}
impl_entity!(ExampleLabel);

/// Mutable properties of [`ExampleLabel`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleLabelUpdate {
    /// New notes, if present
    pub notes: Option<String>,
}

impl ExampleLabelUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut ExampleLabel) {
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
    }
}

// ============================================================================
// Scorers and scores
// ============================================================================

/// A family of scorers (exact-match, LLM judge, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerClass {
    /// Generated unique id
    pub id: String,
    /// Scorer class name (immutable)
    pub name: String,
    /// Free-form description (mutable)
    pub description: Option<String>,
}
impl_entity!(ScorerClass);

/// Mutable properties of [`ScorerClass`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorerClassUpdate {
    /// New description, if present
    pub description: Option<String>,
}

impl ScorerClassUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut ScorerClass) {
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
    }
}

/// A concrete, parameterized version of a [`ScorerClass`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerInstance {
    /// Generated unique id
    pub id: String,
    /// Owning scorer class (immutable, required reference)
    pub scorer_class_id: String,
    /// Version label within the class (immutable)
    pub version_tag: String,
    /// Scorer configuration (mutable)
    pub parameters: serde_json::Value,
    /// Free-form description (mutable)
    pub description: Option<String>,
}
impl_entity!(ScorerInstance);

/// Mutable properties of [`ScorerInstance`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorerInstanceUpdate {
    /// New parameters, if present
    pub parameters: Option<serde_json::Value>,
    /// New description, if present
    pub description: Option<String>,
}

impl ScorerInstanceUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut ScorerInstance) {
        if let Some(parameters) = &self.parameters {
            record.parameters = parameters.clone();
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
    }
}

/// One scorer's judgment of one generation against one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Generated unique id
    pub id: String,
    /// Scoring scorer instance (immutable, required reference)
    pub scorer_instance_id: String,
    /// Scored generation (immutable, required reference)
    pub generation_result_id: String,
    /// Ground-truth label used (immutable, required reference)
    pub example_label_id: String,
    /// Input under evaluation (immutable, required reference)
    pub input_payload_id: String,
    /// The score payload (immutable)
    pub score: serde_json::Value,
    /// Annotation notes (mutable)
    pub notes: Option<String>,
}
impl_entity!(ScoreResult);

/// Mutable properties of [`ScoreResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResultUpdate {
    /// New notes, if present
    pub notes: Option<String>,
}

impl ScoreResultUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut ScoreResult) {
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
    }
}

// ============================================================================
// Evaluation summaries
// ============================================================================

/// The roll-up of one evaluation run: which model, task, and scorer were
/// used, over which examples/labels/scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Generated unique id
    pub id: String,
    /// Evaluated model instance (immutable, required reference)
    pub model_instance_id: String,
    /// Task evaluated against (immutable, required reference)
    pub task_definition_id: String,
    /// Scorer instance used (immutable, required reference)
    pub scorer_instance_id: String,
    /// Examples covered (immutable, every id a required reference)
    pub task_example_ids: Vec<String>,
    /// Labels used (immutable, every id a required reference)
    pub example_label_ids: Vec<String>,
    /// Scores produced (immutable, every id a required reference)
    pub score_result_ids: Vec<String>,
    /// Aggregate metrics (mutable; recomputed as analysis evolves)
    pub summary_metrics: serde_json::Value,
    /// Annotation notes (mutable)
    pub notes: Option<String>,
}
impl_entity!(EvaluationSummary);

/// Mutable properties of [`EvaluationSummary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummaryUpdate {
    /// New aggregate metrics, if present
    pub summary_metrics: Option<serde_json::Value>,
    /// New notes, if present
    pub notes: Option<String>,
}

impl EvaluationSummaryUpdate {
    /// Apply the set fields to a record.
    pub fn apply(&self, record: &mut EvaluationSummary) {
        if let Some(summary_metrics) = &self.summary_metrics {
            record.summary_metrics = summary_metrics.clone();
        }
        if let Some(notes) = &self.notes {
            record.notes = Some(notes.clone());
        }
    }
}
