use std::sync::Arc;

use crate::subjects::{InMemorySubjectStore, SubjectAggregate, SubjectAggregator, SubjectCode};

pub(super) fn subject(
    name: &str,
    pass_count: u32,
    fail_count: u32,
    average_score: i64,
) -> SubjectAggregate {
    SubjectAggregate {
        name: name.to_string(),
        code: SubjectCode(format!("{}-code", name.to_ascii_uppercase())),
        pass_count,
        fail_count,
        average_score,
    }
}

/// The five subjects of the demo semester.
pub(super) fn semester_three() -> Vec<SubjectAggregate> {
    vec![
        subject("Data Structures", 45, 5, 72),
        subject("Maths-III", 28, 22, 45),
        subject("Digital Logic", 40, 10, 65),
        subject("COA", 48, 2, 80),
        subject("Discrete Str", 35, 15, 55),
    ]
}

pub(super) fn aggregator_with(
    subjects: Vec<SubjectAggregate>,
) -> (Arc<InMemorySubjectStore>, SubjectAggregator<InMemorySubjectStore>) {
    let store = Arc::new(InMemorySubjectStore::seeded(subjects));
    let aggregator = SubjectAggregator::new(store.clone());
    (store, aggregator)
}

pub(super) fn names(subjects: &[SubjectAggregate]) -> Vec<&str> {
    subjects.iter().map(|subject| subject.name.as_str()).collect()
}
