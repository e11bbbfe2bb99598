//! Cross-crate scenarios for the evaluation entity graph.
//!
//! Exercises the documented-but-surprising semantics end to end through the
//! `TraceVault` facade: append-only id namespace, non-cascading deletes,
//! all-or-nothing single-entity creates, and concurrent id generation.

use std::sync::Arc;
use tracevault::prelude::*;

fn seed_class(vault: &TraceVault) -> String {
    vault
        .evals
        .create_model_class(CreateModelClassReq {
            name: "chat-large".to_string(),
            provider: "acme".to_string(),
            description: Some("baseline chat model".to_string()),
        })
        .unwrap()
        .id
}

fn seed_instance(vault: &TraceVault, class_id: &str) -> String {
    vault
        .evals
        .create_model_instance(CreateModelInstanceReq {
            model_class_id: class_id.to_string(),
            version_tag: "v1".to_string(),
            parameters: serde_json::json!({"temperature": 0.0}),
            description: None,
        })
        .unwrap()
        .id
}

#[test]
fn deleting_a_class_leaves_instances_readable() {
    let vault = TraceVault::new();
    let class_id = seed_class(&vault);
    let instance_id = seed_instance(&vault, &class_id);

    vault
        .evals
        .delete_model_class(DeleteModelClassReq { id: class_id.clone() })
        .unwrap();

    let err = vault
        .evals
        .get_model_class(GetModelClassReq { id: class_id.clone() })
        .unwrap_err();
    assert_eq!(err.to_string(), format!("ModelClass {} not found", class_id));

    // Non-cascading: the instance survives with its dangling reference.
    let instance = vault
        .evals
        .get_model_instance(GetModelInstanceReq { id: instance_id })
        .unwrap();
    assert_eq!(instance.model_class_id, class_id);
}

#[test]
fn creating_against_missing_reference_fails_precisely() {
    let vault = TraceVault::new();
    let err = vault
        .evals
        .create_model_instance(CreateModelInstanceReq {
            model_class_id: "ghost".to_string(),
            version_tag: "v1".to_string(),
            parameters: serde_json::json!({}),
            description: None,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "ModelClass ghost not found");
    assert!(err.is_not_found());
}

#[test]
fn tombstoned_entity_is_gone_for_reads_and_deletes() {
    let vault = TraceVault::new();
    let class_id = seed_class(&vault);

    vault
        .evals
        .delete_model_class(DeleteModelClassReq { id: class_id.clone() })
        .unwrap();

    // Reads, updates, and repeat deletes all see NotFound.
    assert!(vault
        .evals
        .get_model_class(GetModelClassReq { id: class_id.clone() })
        .unwrap_err()
        .is_not_found());
    assert!(vault
        .evals
        .update_model_class(UpdateModelClassReq {
            id: class_id.clone(),
            updates: ModelClassUpdate {
                description: Some("rewrite".to_string()),
            },
        })
        .unwrap_err()
        .is_not_found());
    assert!(vault
        .evals
        .delete_model_class(DeleteModelClassReq { id: class_id })
        .unwrap_err()
        .is_not_found());
}

#[test]
fn deleted_reference_still_blocks_dependent_creates() {
    let vault = TraceVault::new();
    let class_id = seed_class(&vault);
    vault
        .evals
        .delete_model_class(DeleteModelClassReq { id: class_id.clone() })
        .unwrap();

    // Reference checks use live visibility: a tombstoned class is gone.
    let err = vault
        .evals
        .create_model_instance(CreateModelInstanceReq {
            model_class_id: class_id.clone(),
            version_tag: "v1".to_string(),
            parameters: serde_json::json!({}),
            description: None,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), format!("ModelClass {} not found", class_id));
}

#[test]
fn partial_updates_merge_rather_than_replace() {
    let vault = TraceVault::new();
    let class_id = seed_class(&vault);

    vault
        .evals
        .update_model_class(UpdateModelClassReq {
            id: class_id.clone(),
            updates: ModelClassUpdate { description: None },
        })
        .unwrap();
    let unchanged = vault
        .evals
        .get_model_class(GetModelClassReq { id: class_id.clone() })
        .unwrap();
    assert_eq!(unchanged.description.as_deref(), Some("baseline chat model"));

    vault
        .evals
        .update_model_class(UpdateModelClassReq {
            id: class_id.clone(),
            updates: ModelClassUpdate {
                description: Some("tuned".to_string()),
            },
        })
        .unwrap();
    let updated = vault
        .evals
        .get_model_class(GetModelClassReq { id: class_id })
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("tuned"));
    assert_eq!(updated.name, "chat-large");
}

#[test]
fn ten_concurrent_class_creates_yield_ten_distinct_readable_ids() {
    let vault = Arc::new(TraceVault::new());
    let handles: Vec<_> = (0..10)
        .map(|i| {
            let vault = Arc::clone(&vault);
            std::thread::spawn(move || {
                vault
                    .evals
                    .create_model_class(CreateModelClassReq {
                        name: format!("class-{}", i),
                        provider: "acme".to_string(),
                        description: None,
                    })
                    .unwrap()
                    .id
            })
        })
        .collect();

    let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let distinct: std::collections::HashSet<&String> = ids.iter().collect();
    assert_eq!(distinct.len(), 10);
    for id in ids {
        assert!(vault
            .evals
            .get_model_class(GetModelClassReq { id })
            .is_ok());
    }
}

#[test]
fn multi_entity_workflows_keep_earlier_progress_on_late_failure() {
    let vault = TraceVault::new();
    let class_id = seed_class(&vault);
    let instance_id = seed_instance(&vault, &class_id);

    // Later step fails on a bad reference...
    assert!(vault
        .evals
        .create_generation_result(CreateGenerationResultReq {
            model_instance_id: instance_id.clone(),
            input_payload_id: "missing-input".to_string(),
            output: serde_json::json!("out"),
            latency_ms: None,
            notes: None,
        })
        .unwrap_err()
        .is_not_found());

    // ...but earlier entities are not rolled back.
    assert!(vault
        .evals
        .get_model_instance(GetModelInstanceReq { id: instance_id })
        .is_ok());
}
