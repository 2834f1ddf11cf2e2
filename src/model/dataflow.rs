use super::intent::Risk;

/// A source→sink observation from the dataflow analyzer (spec.md §3 `DataFlow`).
///
/// Pure record — consumed by downstream tooling, not interpreted further
/// inside the pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFlow {
    pub source: String,
    pub sink: String,
    pub transform: String,
    pub risk: Risk,
}

impl DataFlow {
    pub fn new(
        source: impl Into<String>,
        sink: impl Into<String>,
        transform: impl Into<String>,
        risk: Risk,
    ) -> Self {
        DataFlow {
            source: source.into(),
            sink: sink.into(),
            transform: transform.into(),
            risk,
        }
    }
}
