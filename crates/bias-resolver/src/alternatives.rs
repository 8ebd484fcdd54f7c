use bias_common::types::{BiasCategory, BiasDatabase, BiasRecord, Reliability};

/// One comparator source per spectrum category other than `exclude`.
///
/// Each category takes its first `high`-reliability record in key order,
/// falling back to the first `medium` one. Categories with neither are left
/// out, so the list can be shorter than four.
pub fn find_alternatives(db: &BiasDatabase, exclude: BiasCategory) -> Vec<BiasRecord> {
    BiasCategory::SPECTRUM
        .iter()
        .copied()
        .filter(|category| *category != exclude)
        .filter_map(|category| {
            first_with(db, category, Reliability::High)
                .or_else(|| first_with(db, category, Reliability::Medium))
        })
        .cloned()
        .collect()
}

fn first_with(db: &BiasDatabase, bias: BiasCategory, reliability: Reliability) -> Option<&BiasRecord> {
    db.iter()
        .map(|(_, record)| record)
        .find(|record| record.bias == bias && record.reliability == reliability)
}
