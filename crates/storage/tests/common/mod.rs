#![allow(dead_code)]
//! Shared helpers for storage integration tests

use cairn_core::{Edge, Nid};
use cairn_storage::codec::{RecordKey, RecordValue};
use cairn_storage::MemorySubstrate;
use std::collections::{HashMap, HashSet};

/// Decode every record held by the substrate
pub fn decoded(substrate: &MemorySubstrate) -> HashMap<RecordKey, RecordValue> {
    substrate
        .dump()
        .into_iter()
        .map(|(raw_key, raw_value)| {
            let key = RecordKey::decode(&raw_key).unwrap();
            let value = RecordValue::from_json(&key, raw_value).unwrap();
            (key, value)
        })
        .collect()
}

/// Panic with a description of the first broken index relationship
pub fn assert_consistent(substrate: &MemorySubstrate) {
    let records = decoded(substrate);

    let mut nodes = HashMap::new();
    let mut edge_lists: HashMap<Nid, Vec<Edge>> = HashMap::new();
    let mut all_nids = Vec::new();
    let mut origin_lists = Vec::new();
    let mut pipeline_lists = Vec::new();

    for (key, value) in records {
        match (key, value) {
            (RecordKey::Node(nid), RecordValue::Node(record)) => {
                assert_eq!(record.node.nid, nid, "node stored under a foreign key");
                nodes.insert(nid, record);
            }
            (RecordKey::NodeEdges(nid), RecordValue::NodeEdges(edges)) => {
                edge_lists.insert(nid, edges);
            }
            (RecordKey::AllNids, RecordValue::AllNids(list)) => all_nids = list,
            (RecordKey::OriginNids(origin), RecordValue::OriginNids(list)) => {
                origin_lists.push((origin, list))
            }
            (RecordKey::PipelineNids(pipeline), RecordValue::PipelineNids(list)) => {
                pipeline_lists.push((pipeline, list))
            }
            _ => {}
        }
    }

    let registered: HashSet<&Nid> = all_nids.iter().collect();
    assert_eq!(registered.len(), all_nids.len(), "all-nids has duplicates");
    for nid in &all_nids {
        assert!(nodes.contains_key(nid), "all-nids lists missing node {nid}");
    }
    for nid in nodes.keys() {
        assert!(registered.contains(nid), "node {nid} missing from all-nids");
    }

    for (owner, edges) in &edge_lists {
        assert!(nodes.contains_key(owner), "edge list of deleted node {owner}");
        for edge in edges {
            assert!(edge.touches(owner), "edge {} does not touch {owner}", edge.eid);
            let other = edge.other_end(owner);
            assert!(nodes.contains_key(other), "edge {} dangles at {other}", edge.eid);
            let mirrored = edge_lists
                .get(other)
                .map(|list| list.iter().any(|e| e.eid == edge.eid))
                .unwrap_or(false);
            assert!(mirrored, "edge {} missing from {other}", edge.eid);
        }
    }

    for (origin, list) in &origin_lists {
        for nid in list {
            let record = nodes
                .get(nid)
                .unwrap_or_else(|| panic!("origin {origin} lists missing node {nid}"));
            assert_eq!(record.origin, Some(*origin));
        }
    }

    for (pipeline, list) in &pipeline_lists {
        for nid in list {
            assert!(
                nodes.contains_key(nid),
                "pipeline {pipeline} lists missing node {nid}"
            );
        }
    }
}
