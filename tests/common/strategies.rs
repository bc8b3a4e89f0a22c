use proptest::prelude::*;

/// Number of levels used by the generated schemas.
pub const DEPTH: u8 = 5;

/// One id cell: a small alphabet so rows collide often, or blank so lineage
/// gaps and orphans show up.
pub fn id_cell_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just("A".to_string()),
        3 => Just("B".to_string()),
        2 => Just("C".to_string()),
        2 => Just(String::new()),
    ]
}

/// One denormalized row. `L0` is always populated so every source yields at
/// least one node.
pub fn row_strategy() -> impl Strategy<Value = Vec<String>> {
    (
        prop_oneof![Just("D1".to_string()), Just("D2".to_string())],
        prop::collection::vec(id_cell_strategy(), (DEPTH - 1) as usize),
    )
        .prop_map(|(root, mut rest)| {
            rest.insert(0, root);
            rest
        })
}

/// A whole source: 1 to 40 rows.
pub fn rows_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(row_strategy(), 1..40)
}
