//! Cascading pipeline deletes

mod common;

use cairn_core::{
    AccountId, EdgeCreateArgs, Error, Nid, NodeBulkDeleteCriteria, NodeCreateArgs,
    NodeCreatedVia, NodeType, OriginId, PipelineId,
};
use cairn_storage::codec::RecordKey;
use cairn_storage::{GraphOps, MemorySubstrate};
use std::sync::Arc;

fn pipeline_criteria(pipeline: &PipelineId) -> NodeBulkDeleteCriteria {
    NodeBulkDeleteCriteria::CreatedVia(NodeCreatedVia::AutoIngestion(pipeline.clone()))
}

async fn create(ops: &GraphOps, args: NodeCreateArgs) -> Nid {
    ops.create_node(args, &AccountId::new("u")).await.unwrap()
}

#[tokio::test]
async fn test_victims_neighbours_and_origins_are_repaired() {
    let substrate = Arc::new(MemorySubstrate::new());
    let ops = GraphOps::new(substrate.clone());
    let pipeline = PipelineId::new("browser-history");
    let origin = OriginId::from_url("https://example.com/article");

    // A and B come from the pipeline, C is manual and shares their origin
    let a = create(
        &ops,
        NodeCreateArgs::new(NodeType::Url, "a")
            .with_pipeline(pipeline.clone())
            .with_origin(origin),
    )
    .await;
    let b = create(
        &ops,
        NodeCreateArgs::new(NodeType::Url, "b")
            .with_pipeline(pipeline.clone())
            .linked_from([a.clone()]),
    )
    .await;
    let c = create(
        &ops,
        NodeCreateArgs::new(NodeType::Text, "c")
            .with_origin(origin)
            .linked_from([a.clone()])
            .linked_to([b.clone()]),
    )
    .await;
    // D only touches B
    let d = create(&ops, NodeCreateArgs::new(NodeType::Text, "d")).await;
    ops.create_edge(
        EdgeCreateArgs {
            from: d.clone(),
            to: b.clone(),
        },
        &AccountId::new("u"),
    )
    .await
    .unwrap();

    let removed = ops.bulk_delete(pipeline_criteria(&pipeline)).await.unwrap();
    assert_eq!(removed, 2);

    for victim in [&a, &b] {
        assert!(ops.get_node(victim).await.unwrap_err().is_not_found());
        assert!(ops.get_edge_list(victim).await.unwrap().is_empty());
    }
    assert!(ops.get_edge_list(&c).await.unwrap().is_empty());
    assert!(ops.get_edge_list(&d).await.unwrap().is_empty());

    let mut remaining = ops.get_all_nids().await.unwrap();
    remaining.sort();
    let mut expected = vec![c.clone(), d];
    expected.sort();
    assert_eq!(remaining, expected);

    let by_origin = ops.get_nodes_by_origin(origin).await.unwrap();
    assert_eq!(by_origin.len(), 1);
    assert_eq!(by_origin[0].nid, c);

    common::assert_consistent(&substrate);
}

#[tokio::test]
async fn test_whole_pipeline_chain_with_outside_neighbour() {
    let substrate = Arc::new(MemorySubstrate::new());
    let ops = GraphOps::new(substrate.clone());
    let pipeline = PipelineId::new("reading-list");

    // A - B - C all come from the pipeline; D is manual and links to B
    let a = create(
        &ops,
        NodeCreateArgs::new(NodeType::Url, "a").with_pipeline(pipeline.clone()),
    )
    .await;
    let b = create(
        &ops,
        NodeCreateArgs::new(NodeType::Url, "b")
            .with_pipeline(pipeline.clone())
            .linked_from([a.clone()]),
    )
    .await;
    let c = create(
        &ops,
        NodeCreateArgs::new(NodeType::Url, "c")
            .with_pipeline(pipeline.clone())
            .linked_from([b.clone()]),
    )
    .await;
    let d = create(&ops, NodeCreateArgs::new(NodeType::Text, "d")).await;
    ops.create_edge(
        EdgeCreateArgs {
            from: d.clone(),
            to: b.clone(),
        },
        &AccountId::new("u"),
    )
    .await
    .unwrap();
    assert_eq!(ops.get_edge_list(&b).await.unwrap().len(), 3);

    let removed = ops.bulk_delete(pipeline_criteria(&pipeline)).await.unwrap();
    assert_eq!(removed, 3);

    for victim in [&a, &b, &c] {
        assert!(ops.get_node(victim).await.unwrap_err().is_not_found());
        assert!(ops.get_edge_list(victim).await.unwrap().is_empty());
    }
    assert!(ops.get_edge_list(&d).await.unwrap().is_empty());
    assert_eq!(ops.get_all_nids().await.unwrap(), vec![d.clone()]);
    assert_eq!(ops.get_node(&d).await.unwrap().text, "d");

    common::assert_consistent(&substrate);
}

#[tokio::test]
async fn test_other_pipelines_are_untouched() {
    let substrate = Arc::new(MemorySubstrate::new());
    let ops = GraphOps::new(substrate.clone());
    let doomed = PipelineId::new("doomed");
    let kept = PipelineId::new("kept");

    create(&ops, NodeCreateArgs::new(NodeType::Url, "x").with_pipeline(doomed.clone())).await;
    let survivor =
        create(&ops, NodeCreateArgs::new(NodeType::Url, "y").with_pipeline(kept.clone())).await;

    assert_eq!(ops.bulk_delete(pipeline_criteria(&doomed)).await.unwrap(), 1);
    assert_eq!(ops.get_all_nids().await.unwrap(), vec![survivor]);
    assert!(substrate
        .dump()
        .contains_key(&RecordKey::PipelineNids(kept.clone()).encode()));

    // Second delete of the same pipeline finds nothing
    assert_eq!(ops.bulk_delete(pipeline_criteria(&doomed)).await.unwrap(), 0);
    common::assert_consistent(&substrate);
}

#[tokio::test]
async fn test_unsupported_criteria_leaves_store_untouched() {
    let substrate = Arc::new(MemorySubstrate::new());
    let ops = GraphOps::new(substrate.clone());
    create(&ops, NodeCreateArgs::new(NodeType::Text, "manual")).await;
    let before = substrate.dump();

    let err = ops
        .bulk_delete(NodeBulkDeleteCriteria::CreatedVia(NodeCreatedVia::Manual))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedDeleteCriteria { .. }));
    assert!(err.is_unsupported());
    assert_eq!(substrate.dump(), before);
}
