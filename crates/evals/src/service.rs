//! The evaluation graph service.
//!
//! [`EvalGraphService`] owns one [`EntityStore`] per entity type — an
//! explicit struct constructed once and passed by reference, never a
//! package-level singleton. Every `create_*`:
//!
//! 1. validates each required foreign reference against the sibling store,
//!    failing with `"<Type> <id> not found"` and leaving no partial record;
//! 2. generates a fresh uuid-v4 id;
//! 3. persists the full properties payload under that id.
//!
//! Deletes tombstone the record and never cascade: entities referencing a
//! deleted id stay readable with the (now-dangling) reference intact. This
//! is intended behavior, not an oversight — reference checks run at
//! creation time only.
//!
//! No cross-entity transactions: a multi-entity workflow that fails halfway
//! keeps the records created by earlier steps.

use crate::api::*;
use crate::entities::*;
use crate::store::EntityStore;
use tracevault_core::{Error, Result};
use uuid::Uuid;

/// One store per entity type; the single shared mutable resource.
#[derive(Debug)]
pub struct EvalGraphService {
    model_classes: EntityStore<ModelClass>,
    model_instances: EntityStore<ModelInstance>,
    input_payloads: EntityStore<InputPayload>,
    generation_results: EntityStore<GenerationResult>,
    task_definitions: EntityStore<TaskDefinition>,
    task_examples: EntityStore<TaskExample>,
    example_labels: EntityStore<ExampleLabel>,
    scorer_classes: EntityStore<ScorerClass>,
    scorer_instances: EntityStore<ScorerInstance>,
    score_results: EntityStore<ScoreResult>,
    evaluation_summaries: EntityStore<EvaluationSummary>,
}

impl Default for EvalGraphService {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh globally-unique id. Never blocks on other entities.
fn next_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check a required foreign reference against its owning store.
///
/// Converts the store's `NotFound` into the `ReferenceIntegrity`
/// specialization, tagging which entity type carried the bad reference.
fn check_ref<T: Clone>(
    store: &EntityStore<T>,
    id: &str,
    referring: &'static str,
) -> Result<()> {
    match store.get(id) {
        Ok(_) => Ok(()),
        Err(Error::NotFound { kind, id }) => Err(Error::ReferenceIntegrity {
            referring,
            kind,
            id,
        }),
        Err(e) => Err(e),
    }
}

macro_rules! crud_ops {
    ($field:ident, $record:ty,
     $get:ident($get_req:ty), $update:ident($update_req:ty), $delete:ident($delete_req:ty)) => {
        /// Read the stored record, or fail NotFound.
        pub fn $get(&self, req: $get_req) -> Result<$record> {
            self.$field.get(&req.id)
        }

        /// Apply the partial mutable-property payload; unset fields are
        /// left untouched.
        pub fn $update(&self, req: $update_req) -> Result<()> {
            self.$field.update(&req.id, |record| req.updates.apply(record))
        }

        /// Tombstone the record. Never cascades to referencing entities.
        pub fn $delete(&self, req: $delete_req) -> Result<()> {
            tracing::debug!(kind = self.$field.kind(), id = %req.id, "delete entity");
            self.$field.delete(&req.id)
        }
    };
}

impl EvalGraphService {
    /// Create an empty service with one store per entity type.
    pub fn new() -> Self {
        EvalGraphService {
            model_classes: EntityStore::new(ModelClass::KIND),
            model_instances: EntityStore::new(ModelInstance::KIND),
            input_payloads: EntityStore::new(InputPayload::KIND),
            generation_results: EntityStore::new(GenerationResult::KIND),
            task_definitions: EntityStore::new(TaskDefinition::KIND),
            task_examples: EntityStore::new(TaskExample::KIND),
            example_labels: EntityStore::new(ExampleLabel::KIND),
            scorer_classes: EntityStore::new(ScorerClass::KIND),
            scorer_instances: EntityStore::new(ScorerInstance::KIND),
            score_results: EntityStore::new(ScoreResult::KIND),
            evaluation_summaries: EntityStore::new(EvaluationSummary::KIND),
        }
    }

    // ========================================================================
    // Creates (reference checks, then persist)
    // ========================================================================

    /// Create a model class.
    pub fn create_model_class(&self, req: CreateModelClassReq) -> Result<CreatedRes> {
        let id = next_id();
        tracing::debug!(%id, name = %req.name, "create ModelClass");
        self.model_classes.create(
            &id,
            ModelClass {
                id: id.clone(),
                name: req.name,
                provider: req.provider,
                description: req.description,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create a model instance. `model_class_id` must resolve.
    pub fn create_model_instance(&self, req: CreateModelInstanceReq) -> Result<CreatedRes> {
        check_ref(&self.model_classes, &req.model_class_id, ModelInstance::KIND)?;
        let id = next_id();
        tracing::debug!(%id, class = %req.model_class_id, "create ModelInstance");
        self.model_instances.create(
            &id,
            ModelInstance {
                id: id.clone(),
                model_class_id: req.model_class_id,
                version_tag: req.version_tag,
                parameters: req.parameters,
                description: req.description,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create an input payload.
    pub fn create_input_payload(&self, req: CreateInputPayloadReq) -> Result<CreatedRes> {
        let id = next_id();
        self.input_payloads.create(
            &id,
            InputPayload {
                id: id.clone(),
                content: req.content,
                notes: req.notes,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create a generation result. Both references must resolve.
    pub fn create_generation_result(
        &self,
        req: CreateGenerationResultReq,
    ) -> Result<CreatedRes> {
        check_ref(
            &self.model_instances,
            &req.model_instance_id,
            GenerationResult::KIND,
        )?;
        check_ref(
            &self.input_payloads,
            &req.input_payload_id,
            GenerationResult::KIND,
        )?;
        let id = next_id();
        self.generation_results.create(
            &id,
            GenerationResult {
                id: id.clone(),
                model_instance_id: req.model_instance_id,
                input_payload_id: req.input_payload_id,
                output: req.output,
                latency_ms: req.latency_ms,
                notes: req.notes,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create a task definition.
    pub fn create_task_definition(&self, req: CreateTaskDefinitionReq) -> Result<CreatedRes> {
        let id = next_id();
        self.task_definitions.create(
            &id,
            TaskDefinition {
                id: id.clone(),
                name: req.name,
                description: req.description,
                instructions: req.instructions,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create a task example. Both references must resolve.
    pub fn create_task_example(&self, req: CreateTaskExampleReq) -> Result<CreatedRes> {
        check_ref(
            &self.task_definitions,
            &req.task_definition_id,
            TaskExample::KIND,
        )?;
        check_ref(&self.input_payloads, &req.input_payload_id, TaskExample::KIND)?;
        let id = next_id();
        self.task_examples.create(
            &id,
            TaskExample {
                id: id.clone(),
                task_definition_id: req.task_definition_id,
                input_payload_id: req.input_payload_id,
                split: req.split,
                notes: req.notes,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create an example label. `task_example_id` must resolve.
    pub fn create_example_label(&self, req: CreateExampleLabelReq) -> Result<CreatedRes> {
        check_ref(&self.task_examples, &req.task_example_id, ExampleLabel::KIND)?;
        let id = next_id();
        self.example_labels.create(
            &id,
            ExampleLabel {
                id: id.clone(),
                task_example_id: req.task_example_id,
                label: req.label,
                notes: req.notes,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create a scorer class.
    pub fn create_scorer_class(&self, req: CreateScorerClassReq) -> Result<CreatedRes> {
        let id = next_id();
        self.scorer_classes.create(
            &id,
            ScorerClass {
                id: id.clone(),
                name: req.name,
                description: req.description,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create a scorer instance. `scorer_class_id` must resolve.
    pub fn create_scorer_instance(&self, req: CreateScorerInstanceReq) -> Result<CreatedRes> {
        check_ref(
            &self.scorer_classes,
            &req.scorer_class_id,
            ScorerInstance::KIND,
        )?;
        let id = next_id();
        self.scorer_instances.create(
            &id,
            ScorerInstance {
                id: id.clone(),
                scorer_class_id: req.scorer_class_id,
                version_tag: req.version_tag,
                parameters: req.parameters,
                description: req.description,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create a score result. All four references must resolve.
    pub fn create_score_result(&self, req: CreateScoreResultReq) -> Result<CreatedRes> {
        check_ref(
            &self.scorer_instances,
            &req.scorer_instance_id,
            ScoreResult::KIND,
        )?;
        check_ref(
            &self.generation_results,
            &req.generation_result_id,
            ScoreResult::KIND,
        )?;
        check_ref(&self.example_labels, &req.example_label_id, ScoreResult::KIND)?;
        check_ref(&self.input_payloads, &req.input_payload_id, ScoreResult::KIND)?;
        let id = next_id();
        self.score_results.create(
            &id,
            ScoreResult {
                id: id.clone(),
                scorer_instance_id: req.scorer_instance_id,
                generation_result_id: req.generation_result_id,
                example_label_id: req.example_label_id,
                input_payload_id: req.input_payload_id,
                score: req.score,
                notes: req.notes,
            },
        )?;
        Ok(CreatedRes { id })
    }

    /// Create an evaluation summary. Every referenced id, including each
    /// element of the three list fields, must resolve.
    pub fn create_evaluation_summary(
        &self,
        req: CreateEvaluationSummaryReq,
    ) -> Result<CreatedRes> {
        check_ref(
            &self.model_instances,
            &req.model_instance_id,
            EvaluationSummary::KIND,
        )?;
        check_ref(
            &self.task_definitions,
            &req.task_definition_id,
            EvaluationSummary::KIND,
        )?;
        check_ref(
            &self.scorer_instances,
            &req.scorer_instance_id,
            EvaluationSummary::KIND,
        )?;
        for te in &req.task_example_ids {
            check_ref(&self.task_examples, te, EvaluationSummary::KIND)?;
        }
        for el in &req.example_label_ids {
            check_ref(&self.example_labels, el, EvaluationSummary::KIND)?;
        }
        for sr in &req.score_result_ids {
            check_ref(&self.score_results, sr, EvaluationSummary::KIND)?;
        }
        let id = next_id();
        tracing::debug!(%id, "create EvaluationSummary");
        self.evaluation_summaries.create(
            &id,
            EvaluationSummary {
                id: id.clone(),
                model_instance_id: req.model_instance_id,
                task_definition_id: req.task_definition_id,
                scorer_instance_id: req.scorer_instance_id,
                task_example_ids: req.task_example_ids,
                example_label_ids: req.example_label_ids,
                score_result_ids: req.score_result_ids,
                summary_metrics: req.summary_metrics,
                notes: req.notes,
            },
        )?;
        Ok(CreatedRes { id })
    }

    // ========================================================================
    // Reads, updates, deletes
    // ========================================================================

    crud_ops!(
        model_classes, ModelClass,
        get_model_class(GetModelClassReq),
        update_model_class(UpdateModelClassReq),
        delete_model_class(DeleteModelClassReq)
    );
    crud_ops!(
        model_instances, ModelInstance,
        get_model_instance(GetModelInstanceReq),
        update_model_instance(UpdateModelInstanceReq),
        delete_model_instance(DeleteModelInstanceReq)
    );
    crud_ops!(
        input_payloads, InputPayload,
        get_input_payload(GetInputPayloadReq),
        update_input_payload(UpdateInputPayloadReq),
        delete_input_payload(DeleteInputPayloadReq)
    );
    crud_ops!(
        generation_results, GenerationResult,
        get_generation_result(GetGenerationResultReq),
        update_generation_result(UpdateGenerationResultReq),
        delete_generation_result(DeleteGenerationResultReq)
    );
    crud_ops!(
        task_definitions, TaskDefinition,
        get_task_definition(GetTaskDefinitionReq),
        update_task_definition(UpdateTaskDefinitionReq),
        delete_task_definition(DeleteTaskDefinitionReq)
    );
    crud_ops!(
        task_examples, TaskExample,
        get_task_example(GetTaskExampleReq),
        update_task_example(UpdateTaskExampleReq),
        delete_task_example(DeleteTaskExampleReq)
    );
    crud_ops!(
        example_labels, ExampleLabel,
        get_example_label(GetExampleLabelReq),
        update_example_label(UpdateExampleLabelReq),
        delete_example_label(DeleteExampleLabelReq)
    );
    crud_ops!(
        scorer_classes, ScorerClass,
        get_scorer_class(GetScorerClassReq),
        update_scorer_class(UpdateScorerClassReq),
        delete_scorer_class(DeleteScorerClassReq)
    );
    crud_ops!(
        scorer_instances, ScorerInstance,
        get_scorer_instance(GetScorerInstanceReq),
        update_scorer_instance(UpdateScorerInstanceReq),
        delete_scorer_instance(DeleteScorerInstanceReq)
    );
    crud_ops!(
        score_results, ScoreResult,
        get_score_result(GetScoreResultReq),
        update_score_result(UpdateScoreResultReq),
        delete_score_result(DeleteScoreResultReq)
    );
    crud_ops!(
        evaluation_summaries, EvaluationSummary,
        get_evaluation_summary(GetEvaluationSummaryReq),
        update_evaluation_summary(UpdateEvaluationSummaryReq),
        delete_evaluation_summary(DeleteEvaluationSummaryReq)
    );
}
