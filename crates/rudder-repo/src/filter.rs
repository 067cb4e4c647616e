//! Chart filtering by name or keyword

use crate::index::{ChartIndex, ChartVersion};

/// Narrow an index to the charts matching `predicate`
///
/// A chart is kept when its index name, the name of any of its versions, or
/// any version's keywords equal the predicate exactly (case-sensitive). An
/// empty predicate keeps everything. The input is left untouched and the
/// surviving charts keep their relative order.
pub fn filter_charts(index: &ChartIndex, predicate: &str) -> ChartIndex {
    if predicate.is_empty() {
        return index.clone();
    }

    let entries = index
        .entries
        .iter()
        .filter(|(name, versions)| matches(name, versions, predicate))
        .map(|(name, versions)| (name.clone(), versions.clone()))
        .collect();

    ChartIndex {
        api_version: index.api_version.clone(),
        generated: index.generated,
        entries,
    }
}

fn matches(name: &str, versions: &[ChartVersion], predicate: &str) -> bool {
    name == predicate
        || versions.iter().any(|v| {
            v.name == predicate || v.keywords.iter().any(|keyword| keyword == predicate)
        })
}
