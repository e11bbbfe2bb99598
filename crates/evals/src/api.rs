//! Request/response shapes for the evaluation graph service.
//!
//! This is the wire contract an external RPC or HTTP layer exposes. Each
//! entity type follows the same pattern:
//!
//! - `Create{Type}Req { properties } -> CreatedRes { id }`
//! - `Get{Type}Req { id } -> record`
//! - `Update{Type}Req { id, updates } -> ()`
//! - `Delete{Type}Req { id } -> ()`
//!
//! Create requests carry the immutable properties (foreign references
//! included) plus initial values for the mutable ones; update requests
//! carry only the `…Update` partial payload from [`crate::entities`].

use crate::entities::*;
use serde::{Deserialize, Serialize};

/// Response to any create: the generated unique id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRes {
    /// The new entity's id
    pub id: String,
}

macro_rules! id_req {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            /// Target entity id
            pub id: String,
        }
    };
}

macro_rules! update_req {
    ($(#[$doc:meta])* $name:ident, $updates:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            /// Target entity id
            pub id: String,
            /// Partial mutable-property payload; unset fields are untouched
            pub updates: $updates,
        }
    };
}

// ===== ModelClass =====

/// Create a [`ModelClass`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateModelClassReq {
    /// Class name
    pub name: String,
    /// Provider name
    pub provider: String,
    /// Initial description
    pub description: Option<String>,
}
id_req!(
    /// Read a [`ModelClass`].
    GetModelClassReq
);
update_req!(
    /// Patch a [`ModelClass`].
    UpdateModelClassReq,
    ModelClassUpdate
);
id_req!(
    /// Tombstone a [`ModelClass`].
    DeleteModelClassReq
);

// ===== ModelInstance =====

/// Create a [`ModelInstance`]. `model_class_id` must resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateModelInstanceReq {
    /// Owning model class
    pub model_class_id: String,
    /// Version label
    pub version_tag: String,
    /// Initial parameters
    pub parameters: serde_json::Value,
    /// Initial description
    pub description: Option<String>,
}
id_req!(
    /// Read a [`ModelInstance`].
    GetModelInstanceReq
);
update_req!(
    /// Patch a [`ModelInstance`].
    UpdateModelInstanceReq,
    ModelInstanceUpdate
);
id_req!(
    /// Tombstone a [`ModelInstance`].
    DeleteModelInstanceReq
);

// ===== InputPayload =====

/// Create an [`InputPayload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInputPayloadReq {
    /// The payload content
    pub content: serde_json::Value,
    /// Initial notes
    pub notes: Option<String>,
}
id_req!(
    /// Read an [`InputPayload`].
    GetInputPayloadReq
);
update_req!(
    /// Patch an [`InputPayload`].
    UpdateInputPayloadReq,
    InputPayloadUpdate
);
id_req!(
    /// Tombstone an [`InputPayload`].
    DeleteInputPayloadReq
);

// ===== GenerationResult =====

/// Create a [`GenerationResult`]. Both references must resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGenerationResultReq {
    /// Producing model instance
    pub model_instance_id: String,
    /// Input that produced the output
    pub input_payload_id: String,
    /// The generated output
    pub output: serde_json::Value,
    /// Initial latency, if measured
    pub latency_ms: Option<u64>,
    /// Initial notes
    pub notes: Option<String>,
}
id_req!(
    /// Read a [`GenerationResult`].
    GetGenerationResultReq
);
update_req!(
    /// Patch a [`GenerationResult`].
    UpdateGenerationResultReq,
    GenerationResultUpdate
);
id_req!(
    /// Tombstone a [`GenerationResult`].
    DeleteGenerationResultReq
);

// ===== TaskDefinition =====

/// Create a [`TaskDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskDefinitionReq {
    /// Task name
    pub name: String,
    /// Initial description
    pub description: Option<String>,
    /// Initial instructions
    pub instructions: Option<String>,
}
id_req!(
    /// Read a [`TaskDefinition`].
    GetTaskDefinitionReq
);
update_req!(
    /// Patch a [`TaskDefinition`].
    UpdateTaskDefinitionReq,
    TaskDefinitionUpdate
);
id_req!(
    /// Tombstone a [`TaskDefinition`].
    DeleteTaskDefinitionReq
);

// ===== TaskExample =====

/// Create a [`TaskExample`]. Both references must resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskExampleReq {
    /// Owning task
    pub task_definition_id: String,
    /// Input for this example
    pub input_payload_id: String,
    /// Initial split tag
    pub split: Option<String>,
    /// Initial notes
    pub notes: Option<String>,
}
id_req!(
    /// Read a [`TaskExample`].
    GetTaskExampleReq
);
update_req!(
    /// Patch a [`TaskExample`].
    UpdateTaskExampleReq,
    TaskExampleUpdate
);
id_req!(
    /// Tombstone a [`TaskExample`].
    DeleteTaskExampleReq
);

// ===== ExampleLabel =====

/// Create an [`ExampleLabel`]. `task_example_id` must resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExampleLabelReq {
    /// Labeled example
    pub task_example_id: String,
    /// The label payload
    pub label: serde_json::Value,
    /// Initial notes
    pub notes: Option<String>,
}
id_req!(
    /// Read an [`ExampleLabel`].
    GetExampleLabelReq
);
update_req!(
    /// Patch an [`ExampleLabel`].
    UpdateExampleLabelReq,
    ExampleLabelUpdate
);
id_req!(
    /// Tombstone an [`ExampleLabel`].
    DeleteExampleLabelReq
);

// ===== ScorerClass =====

/// Create a [`ScorerClass`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScorerClassReq {
    /// Scorer class name
    pub name: String,
    /// Initial description
    pub description: Option<String>,
}
id_req!(
    /// Read a [`ScorerClass`].
    GetScorerClassReq
);
update_req!(
    /// Patch a [`ScorerClass`].
    UpdateScorerClassReq,
    ScorerClassUpdate
);
id_req!(
    /// Tombstone a [`ScorerClass`].
    DeleteScorerClassReq
);

// ===== ScorerInstance =====

/// Create a [`ScorerInstance`]. `scorer_class_id` must resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateScorerInstanceReq {
    /// Owning scorer class
    pub scorer_class_id: String,
    /// Version label
    pub version_tag: String,
    /// Initial configuration
    pub parameters: serde_json::Value,
    /// Initial description
    pub description: Option<String>,
}
id_req!(
    /// Read a [`ScorerInstance`].
    GetScorerInstanceReq
);
update_req!(
    /// Patch a [`ScorerInstance`].
    UpdateScorerInstanceReq,
    ScorerInstanceUpdate
);
id_req!(
    /// Tombstone a [`ScorerInstance`].
    DeleteScorerInstanceReq
);

// ===== ScoreResult =====

/// Create a [`ScoreResult`]. All four references must resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateScoreResultReq {
    /// Scoring scorer instance
    pub scorer_instance_id: String,
    /// Scored generation
    pub generation_result_id: String,
    /// Ground-truth label used
    pub example_label_id: String,
    /// Input under evaluation
    pub input_payload_id: String,
    /// The score payload
    pub score: serde_json::Value,
    /// Initial notes
    pub notes: Option<String>,
}
id_req!(
    /// Read a [`ScoreResult`].
    GetScoreResultReq
);
update_req!(
    /// Patch a [`ScoreResult`].
    UpdateScoreResultReq,
    ScoreResultUpdate
);
id_req!(
    /// Tombstone a [`ScoreResult`].
    DeleteScoreResultReq
);

// ===== EvaluationSummary =====

/// Create an [`EvaluationSummary`]. Every id, including every element of
/// the three list fields, must resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEvaluationSummaryReq {
    /// Evaluated model instance
    pub model_instance_id: String,
    /// Task evaluated against
    pub task_definition_id: String,
    /// Scorer instance used
    pub scorer_instance_id: String,
    /// Examples covered
    pub task_example_ids: Vec<String>,
    /// Labels used
    pub example_label_ids: Vec<String>,
    /// Scores produced
    pub score_result_ids: Vec<String>,
    /// Initial aggregate metrics
    pub summary_metrics: serde_json::Value,
    /// Initial notes
    pub notes: Option<String>,
}
id_req!(
    /// Read an [`EvaluationSummary`].
    GetEvaluationSummaryReq
);
update_req!(
    /// Patch an [`EvaluationSummary`].
    UpdateEvaluationSummaryReq,
    EvaluationSummaryUpdate
);
id_req!(
    /// Tombstone an [`EvaluationSummary`].
    DeleteEvaluationSummaryReq
);
