use std::collections::BTreeSet;

use proptest::prelude::*;

use semisplay::{Config, Set, StringSet};

#[derive(Copy, Clone, Debug)]
enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug)]
enum Op {
    Add(ItemValue),
    Contains(ItemValue),
    Remove(ItemValue),
    First,
    Last,
}

impl Op {
    // Index values pick one of the keys currently in the model, so that lookups and removals hit
    fn finalize(self, model: &BTreeSet<u32>) -> FinalOp {
        fn get_value(model: &BTreeSet<u32>, item: ItemValue) -> u32 {
            match item {
                ItemValue::Index(idx) => match model.iter().nth(idx % model.len().max(1)) {
                    Some(&key) => key,
                    None => idx as u32,
                },
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Add(item) => FinalOp::Add(get_value(model, item)),
            Op::Contains(item) => FinalOp::Contains(get_value(model, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(model, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Add(u32),
    Contains(u32),
    Remove(u32),
    First,
    Last,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Add),
        value_strategy().prop_map(Op::Contains),
        value_strategy().prop_map(Op::Remove),
        Just(Op::First),
        Just(Op::Last),
    ]
}

fn run_btree_equivalence(config: Config, ops: Vec<Op>) {
    let mut btree = BTreeSet::new();
    let mut set = Set::with_config(config);

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&btree);

        match final_op {
            FinalOp::Add(value) => {
                assert_eq!(btree.insert(value), set.add(value), "FinalOp #{op_id}: {final_op:?}");
            }
            FinalOp::Contains(value) => {
                assert_eq!(
                    btree.contains(&value),
                    set.contains(&value),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }
            FinalOp::Remove(value) => {
                assert_eq!(btree.remove(&value), set.remove(&value), "FinalOp #{op_id}: {final_op:?}");
            }
            FinalOp::First => {
                assert_eq!(btree.first(), set.first(), "FinalOp #{op_id}: {final_op:?}");
            }
            FinalOp::Last => {
                assert_eq!(btree.last(), set.last(), "FinalOp #{op_id}: {final_op:?}");
            }
        }

        set.assert_invariants();
        assert_eq!(btree.len(), set.size());
        assert_eq!(set.depth() == -1, btree.is_empty());
    }

    assert!(btree.iter().eq(set.iter()));
    assert_eq!(set.iter().len(), btree.len());
}

proptest! {
    #[test]
    fn btree_equivalence_3(ops in proptest::collection::vec(op_strategy(), 0..500)) {
        run_btree_equivalence(Config::new(3), ops);
    }

    #[test]
    fn btree_equivalence_4(ops in proptest::collection::vec(op_strategy(), 0..500)) {
        run_btree_equivalence(Config::new(4), ops);
    }

    #[test]
    fn btree_equivalence_7(ops in proptest::collection::vec(op_strategy(), 0..500)) {
        run_btree_equivalence(Config::new(7), ops);
    }

    #[test]
    fn btree_equivalence_no_lookup_splay(ops in proptest::collection::vec(op_strategy(), 0..500)) {
        run_btree_equivalence(Config::new(5).splay_on_lookup(false), ops);
    }

    #[test]
    fn iterates_in_order(keys in proptest::collection::vec(any::<i64>(), 0..300), splay_size in 3usize..16) {
        let mut set = Set::new(splay_size);
        set.extend(keys.iter().copied());

        let expected: BTreeSet<i64> = keys.into_iter().collect();
        prop_assert_eq!(set.size(), expected.len());
        prop_assert!(set.iter().eq(expected.iter()));
        set.assert_invariants();
    }

    #[test]
    fn depth_is_bounded_by_size(keys in proptest::collection::vec(0u16..2000, 1..300), splay_size in 3usize..16) {
        let mut set = Set::new(splay_size);
        set.extend(keys);

        let depth = set.depth();
        prop_assert!(depth >= 0);
        prop_assert!((depth as usize) < set.size());
    }

    #[test]
    fn string_sets_match_model(keys in proptest::collection::vec("[a-z]{0,6}", 0..200)) {
        let mut set = StringSet::new(3);
        let mut model = BTreeSet::new();

        for (i, key) in keys.iter().enumerate() {
            if i % 3 == 2 {
                prop_assert_eq!(model.remove(key.as_str()), set.remove(key));
            } else {
                prop_assert_eq!(model.insert(key.as_str()), set.add(key));
            }
            set.assert_invariants();
        }

        prop_assert!(set.iter().eq(model.iter().copied()));
    }
}
