// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Property tests for path derivation and id allocation

use proptest::prelude::*;
use scanstore::{DatabaseMetadata, DescriptorKey, Metadata, PathResolver};
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    AddTable(u8),
    RemoveTable(u8),
    AddJob(u8),
    RemoveJob(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::AddTable),
        any::<u8>().prop_map(Op::RemoveTable),
        any::<u8>().prop_map(Op::AddJob),
        any::<u8>().prop_map(Op::RemoveJob),
    ]
}

fn key() -> impl Strategy<Value = DescriptorKey> {
    prop_oneof![
        Just(DescriptorKey::Database),
        any::<i32>().prop_map(DescriptorKey::Table),
        any::<i32>().prop_map(DescriptorKey::Job),
        (any::<i32>(), any::<i32>(), any::<i32>()).prop_map(|(t, c, i)| DescriptorKey::Video {
            table_id: t,
            column_id: c,
            item_id: i
        }),
        (any::<i32>(), any::<i32>(), any::<i32>()).prop_map(|(t, c, i)| {
            DescriptorKey::ImageFormatGroup {
                table_id: t,
                column_id: c,
                item_id: i,
            }
        }),
    ]
}

proptest! {
    #[test]
    fn paths_are_deterministic(k in key(), root in "[a-z/]{0,12}") {
        let a = PathResolver::new(root.clone());
        let b = PathResolver::new(root);
        prop_assert_eq!(a.path(&k), b.path(&k));
    }

    #[test]
    fn paths_are_injective(k1 in key(), k2 in key(), root in "[a-z]{0,8}") {
        let paths = PathResolver::new(root);
        if k1 != k2 {
            prop_assert_ne!(paths.path(&k1), paths.path(&k2));
        } else {
            prop_assert_eq!(paths.path(&k1), paths.path(&k2));
        }
    }

    #[test]
    fn table_ids_are_issued_in_order(n in 0usize..64) {
        let mut db = DatabaseMetadata::new();
        let ids: Vec<i32> = (0..n)
            .map(|i| db.add_table(&format!("t{}", i)).unwrap())
            .collect();
        prop_assert_eq!(ids, (0..n as i32).collect::<Vec<_>>());
    }

    #[test]
    fn ids_are_never_reissued(ops in proptest::collection::vec(op(), 0..80)) {
        let mut db = DatabaseMetadata::new();
        let mut issued_tables = HashSet::new();
        let mut issued_jobs = HashSet::new();

        for op in ops {
            match op {
                Op::AddTable(n) => {
                    if let Ok(id) = db.add_table(&format!("t{}", n)) {
                        prop_assert!(issued_tables.insert(id));
                    }
                }
                Op::RemoveTable(n) => {
                    let _ = db.remove_table(n as i32 % 16);
                }
                Op::AddJob(n) => {
                    if let Ok(id) = db.add_job(&format!("j{}", n)) {
                        prop_assert!(issued_jobs.insert(id));
                    }
                }
                Op::RemoveJob(n) => {
                    let _ = db.remove_job(n as i32 % 16);
                }
            }
        }
        prop_assert_eq!(db.next_table_id() as usize, issued_tables.len());
        prop_assert_eq!(db.next_job_id() as usize, issued_jobs.len());
    }

    #[test]
    fn catalog_survives_descriptor_round_trip(ops in proptest::collection::vec(op(), 0..80)) {
        let mut db = DatabaseMetadata::new();
        for op in ops {
            match op {
                Op::AddTable(n) => { let _ = db.add_table(&format!("t{}", n % 32)); }
                Op::RemoveTable(n) => { let _ = db.remove_table(n as i32 % 32); }
                Op::AddJob(n) => { let _ = db.add_job(&format!("j{}", n % 32)); }
                Op::RemoveJob(n) => { let _ = db.remove_job(n as i32 % 32); }
            }
        }

        let mut reloaded = DatabaseMetadata::from_descriptor(db.get_descriptor()).unwrap();
        for n in 0..32 {
            let table = format!("t{}", n);
            let job = format!("j{}", n);
            prop_assert_eq!(db.has_table(&table), reloaded.has_table(&table));
            prop_assert_eq!(db.has_job(&job), reloaded.has_job(&job));
            prop_assert_eq!(db.has_table_id(n), reloaded.has_table_id(n));
            prop_assert_eq!(db.has_job_id(n), reloaded.has_job_id(n));
            prop_assert_eq!(db.get_table_id(&table).ok(), reloaded.get_table_id(&table).ok());
            prop_assert_eq!(db.get_job_name(n).ok(), reloaded.get_job_name(n).ok());
        }
        prop_assert_eq!(db.get_descriptor(), reloaded.get_descriptor());
        prop_assert_eq!(
            db.clone().add_table("fresh").unwrap(),
            reloaded.add_table("fresh").unwrap()
        );
    }
}
