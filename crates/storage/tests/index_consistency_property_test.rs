//! Derived indexes stay consistent under random operation sequences

mod common;

use cairn_core::{
    AccountId, EdgeCreateArgs, NodeBulkDeleteCriteria, NodeCreateArgs, NodeCreatedVia, NodeType,
    NodeUpdateArgs, OriginId, PipelineId,
};
use cairn_storage::{GraphOps, MemorySubstrate};
use proptest::collection::vec;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Create {
        pipeline: Option<u8>,
        origin: Option<u8>,
        link_from: Option<usize>,
        link_to: Option<usize>,
    },
    Link {
        from: usize,
        to: usize,
    },
    Update {
        target: usize,
    },
    DeletePipeline {
        pipeline: u8,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (
            proptest::option::of(0u8..3),
            proptest::option::of(0u8..3),
            proptest::option::of(any::<usize>()),
            proptest::option::of(any::<usize>()),
        )
            .prop_map(|(pipeline, origin, link_from, link_to)| Op::Create {
                pipeline,
                origin,
                link_from,
                link_to,
            }),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(from, to)| Op::Link { from, to }),
        1 => any::<usize>().prop_map(|target| Op::Update { target }),
        1 => (0u8..3).prop_map(|pipeline| Op::DeletePipeline { pipeline }),
    ]
}

async fn apply(ops: &GraphOps, op: Op) {
    let account = AccountId::new("prop");
    let live = ops.get_all_nids().await.unwrap();
    let pick = |i: usize| live.get(i % live.len().max(1)).cloned();

    match op {
        Op::Create {
            pipeline,
            origin,
            link_from,
            link_to,
        } => {
            let mut args = NodeCreateArgs::new(NodeType::Text, "generated");
            if let Some(p) = pipeline {
                args = args.with_pipeline(PipelineId::new(format!("p{p}")));
            }
            if let Some(o) = origin {
                args = args.with_origin(OriginId::new(u64::from(o)));
            }
            if let Some(nid) = link_from.and_then(pick) {
                args = args.linked_from([nid]);
            }
            if let Some(nid) = link_to.and_then(pick) {
                args = args.linked_to([nid]);
            }
            ops.create_node(args, &account).await.unwrap();
        }
        Op::Link { from, to } => {
            if let (Some(from), Some(to)) = (pick(from), pick(to)) {
                ops.create_edge(EdgeCreateArgs { from, to }, &account)
                    .await
                    .unwrap();
            }
        }
        Op::Update { target } => {
            if let Some(nid) = pick(target) {
                ops.update_node(NodeUpdateArgs::new(nid).with_text("changed"))
                    .await
                    .unwrap();
            }
        }
        Op::DeletePipeline { pipeline } => {
            ops.bulk_delete(NodeBulkDeleteCriteria::CreatedVia(
                NodeCreatedVia::AutoIngestion(PipelineId::new(format!("p{pipeline}"))),
            ))
            .await
            .unwrap();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn indexes_stay_consistent(sequence in vec(op_strategy(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let substrate = Arc::new(MemorySubstrate::new());
            let ops = GraphOps::new(substrate.clone());
            for op in sequence {
                apply(&ops, op).await;
                common::assert_consistent(&substrate);
            }
        });
    }
}
