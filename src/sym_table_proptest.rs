#![cfg(test)]

// Property tests kept inside the crate so they can call the internal
// invariant checks of HashSymTable.

use crate::hash_sym_table::{HashSymTable, BUCKET_COUNTS};
use crate::list_sym_table::ListSymTable;
use crate::sym_table::SymTable;
use crate::PutError;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Replace(usize, i32),
    Get(usize),
    Contains(String),
    Remove(usize),
    Bump(usize, i32),
    Visit,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-zA-Z0-9_]{0,6}", 1..=10).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Replace(i, v)),
            idx.clone().prop_map(Op::Get),
            prop_oneof![contains_pool, "[a-z]{0,4}".prop_map(|s| s)].prop_map(Op::Contains),
            idx.clone().prop_map(Op::Remove),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Bump(i, d)),
            Just(Op::Visit),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Run `ops` against `sut` and a std HashMap model; `after_op` sees the
// table after every step.
fn run_against_model<T, F>(
    sut: &mut T,
    pool: &[String],
    ops: Vec<Op>,
    mut after_op: F,
) -> Result<(), TestCaseError>
where
    T: SymTable<i32>,
    F: FnMut(&T),
{
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.put(k, v) {
                    Ok(()) => {
                        prop_assert!(!already, "put must fail on duplicate");
                        model.insert(k.clone(), v);
                    }
                    Err(PutError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                    Err(e) => prop_assert!(false, "unexpected error: {}", e),
                }
            }
            Op::Replace(i, v) => {
                let k = &pool[i];
                let expected = model.get_mut(k).map(|slot| std::mem::replace(slot, v));
                prop_assert_eq!(sut.replace(k, v), expected);
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(!sut.contains(k));
            }
            Op::Bump(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k), model.get_mut(k)) {
                    (Some(v), Some(m)) => {
                        *v = v.wrapping_add(d);
                        *m = m.wrapping_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "presence mismatch: {:?} vs {:?}", s, m),
                }
            }
            Op::Visit => {
                let mut seen: BTreeMap<String, i32> = BTreeMap::new();
                let mut dup = false;
                sut.for_each(|k, v| dup |= seen.insert(k.to_string(), *v).is_some());
                prop_assert!(!dup, "traversal visited a key twice");
                let expected: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        after_op(&*sut);
    }
    Ok(())
}

// Forces every key into one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Capacity reached once the entry count has peaked at `peak`.
fn expected_capacity(peak: usize) -> usize {
    BUCKET_COUNTS
        .iter()
        .copied()
        .find(|&c| peak <= c)
        .unwrap_or(BUCKET_COUNTS[BUCKET_COUNTS.len() - 1])
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate keys are rejected; the stored value is untouched.
// - get/contains/replace/remove agree with the model; absence is None.
// - Traversal visits every live binding exactly once.
// - len parity after each op; every node is reachable from the bucket its
//   key hashes to, and nowhere else.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_hash_table_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: HashSymTable<i32> = HashSymTable::new();
        run_against_model(&mut sut, &pool, ops, |t| t.check_invariants())?;
    }

    #[test]
    fn prop_hash_table_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: HashSymTable<i32, ConstBuildHasher> = HashSymTable::with_hasher(ConstBuildHasher);
        run_against_model(&mut sut, &pool, ops, |t| t.check_invariants())?;
    }

    #[test]
    fn prop_list_table_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: ListSymTable<i32> = ListSymTable::new();
        run_against_model(&mut sut, &pool, ops, |t| {
            assert_eq!(t.iter().count(), t.len());
        })?;
    }
}

// Property: growth is lossless and follows the schedule.
// - Capacity is the first scheduled count not below the peak entry count.
// - Interleaved removals never shrink the bucket array.
// - Every surviving key is still retrievable with its value.
proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_is_lossless(
        n in 400usize..2_500,
        removals in proptest::collection::vec(0usize..2_500, 0..400),
    ) {
        let mut sut: HashSymTable<usize> = HashSymTable::new();
        let mut peak = 0;
        for i in 0..n {
            let inserted = sut.put(&format!("id_{i}"), i).is_ok();
            prop_assert!(inserted, "put of id_{} failed", i);
            peak = peak.max(sut.len());
            prop_assert_eq!(sut.capacity(), expected_capacity(peak));
        }
        for r in removals {
            let present = r < n && sut.contains(&format!("id_{r}"));
            prop_assert_eq!(sut.remove(&format!("id_{r}")).is_some(), present);
        }
        prop_assert_eq!(sut.capacity(), expected_capacity(peak));
        sut.check_invariants();
        let mut visited = 0;
        sut.for_each(|k, v| {
            assert_eq!(k, format!("id_{v}"));
            visited += 1;
        });
        prop_assert_eq!(visited, sut.len());
    }
}
