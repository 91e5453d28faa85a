use crate::aggregator::CountMap;
use std::cmp::Reverse;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub keyword: String,
    pub count: u64,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.keyword, self.count)
    }
}

/// Non-zero counts, highest first, ties in keyword order.
pub fn format_report(counts: &CountMap) -> Vec<ReportLine> {
    let mut lines: Vec<ReportLine> = counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(keyword, count)| ReportLine {
            keyword: keyword.to_string(),
            count,
        })
        .collect();

    lines.sort_by(|a, b| {
        (Reverse(a.count), &a.keyword).cmp(&(Reverse(b.count), &b.keyword))
    });
    lines
}

pub fn render(lines: &[ReportLine]) -> Vec<String> {
    lines.iter().map(ReportLine::to_string).collect()
}
