//! Ranking of files by uncovered new lines.

use crate::api::types::{ComponentTreeResponse, TreeComponent, strip_project_prefix};
use crate::measures::extract_number;
use core::cmp::Reverse;

/// Per-file new-code coverage, derived transiently from one component tree response.
///
/// `uncovered_lines` is always known (files reporting nothing count as zero and are
/// filtered out); the other two fields stay absent when the service did not return
/// them, so "no data" remains distinguishable from zero downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageFileDetail {
    pub path: String,
    pub uncovered_lines: u64,
    pub lines_to_cover: Option<f64>,
    pub coverage: Option<f64>,
}

/// Ranks the files of a component tree by uncovered new lines, descending.
///
/// Files with no uncovered lines are dropped. Ties keep the server's order (the
/// sort is stable). Pure function of its input.
#[must_use]
pub fn rank_uncovered_files(tree: &ComponentTreeResponse, project_key: &str) -> Vec<CoverageFileDetail> {
    let mut details: Vec<_> = tree
        .components
        .iter()
        .map(|component| file_detail(component, project_key))
        .filter(|detail| detail.uncovered_lines > 0)
        .collect();

    details.sort_by_key(|detail| Reverse(detail.uncovered_lines));
    details
}

fn file_detail(component: &TreeComponent, project_key: &str) -> CoverageFileDetail {
    let path = component
        .path
        .clone()
        .unwrap_or_else(|| strip_project_prefix(&component.key, project_key).to_string());

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "line counts are small non-negative integers")]
    let uncovered_lines = extract_number(&component.measures, "new_uncovered_lines").unwrap_or(0.0).max(0.0) as u64;

    CoverageFileDetail {
        path,
        uncovered_lines,
        lines_to_cover: extract_number(&component.measures, "new_lines_to_cover"),
        coverage: extract_number(&component.measures, "new_coverage"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Measure, MeasurePeriod};

    fn measure(metric: &str, value: &str) -> Measure {
        Measure {
            metric: metric.to_string(),
            periods: vec![MeasurePeriod {
                index: Some(1),
                value: Some(value.to_string()),
            }],
            ..Measure::default()
        }
    }

    fn file(key: &str, path: Option<&str>, measures: Vec<Measure>) -> TreeComponent {
        TreeComponent {
            key: key.to_string(),
            name: None,
            path: path.map(ToString::to_string),
            qualifier: Some("FIL".to_string()),
            measures,
        }
    }

    fn tree(components: Vec<TreeComponent>) -> ComponentTreeResponse {
        ComponentTreeResponse {
            paging: None,
            base_component: None,
            components,
        }
    }

    #[test]
    fn empty_tree_ranks_empty() {
        assert!(rank_uncovered_files(&tree(vec![]), "proj").is_empty());
    }

    #[test]
    fn fully_covered_file_is_excluded() {
        let input = tree(vec![file(
            "proj:src/lib.rs",
            Some("src/lib.rs"),
            vec![measure("new_uncovered_lines", "0"), measure("new_lines_to_cover", "12")],
        )]);

        assert!(rank_uncovered_files(&input, "proj").is_empty());
    }

    #[test]
    fn file_without_measures_is_excluded() {
        let input = tree(vec![file("proj:src/lib.rs", Some("src/lib.rs"), vec![])]);
        assert!(rank_uncovered_files(&input, "proj").is_empty());
    }

    #[test]
    fn ranks_descending_and_filters_zero() {
        let input = tree(vec![
            file("proj:a.rs", Some("a.rs"), vec![measure("new_uncovered_lines", "2")]),
            file("proj:b.rs", Some("b.rs"), vec![measure("new_uncovered_lines", "0")]),
            file("proj:c.rs", Some("c.rs"), vec![measure("new_uncovered_lines", "1")]),
        ]);

        let ranked = rank_uncovered_files(&input, "proj");
        let order: Vec<_> = ranked.iter().map(|d| (d.path.as_str(), d.uncovered_lines)).collect();
        assert_eq!(order, vec![("a.rs", 2), ("c.rs", 1)]);
    }

    #[test]
    fn missing_optional_fields_stay_absent() {
        let input = tree(vec![
            file(
                "proj:src/a.rs",
                Some("src/a.rs"),
                vec![
                    measure("new_uncovered_lines", "2"),
                    measure("new_lines_to_cover", "10"),
                    measure("new_coverage", "80"),
                ],
            ),
            file("proj:src/b.rs", Some("src/b.rs"), vec![measure("new_uncovered_lines", "0")]),
            file("proj:src/c.rs", Some("src/c.rs"), vec![measure("new_uncovered_lines", "1")]),
        ]);

        let ranked = rank_uncovered_files(&input, "proj");
        assert_eq!(
            ranked,
            vec![
                CoverageFileDetail {
                    path: "src/a.rs".to_string(),
                    uncovered_lines: 2,
                    lines_to_cover: Some(10.0),
                    coverage: Some(80.0),
                },
                CoverageFileDetail {
                    path: "src/c.rs".to_string(),
                    uncovered_lines: 1,
                    lines_to_cover: None,
                    coverage: None,
                },
            ]
        );
    }

    #[test]
    fn path_falls_back_to_stripped_key() {
        let input = tree(vec![file("proj:src/deep/mod.rs", None, vec![measure("new_uncovered_lines", "3")])]);

        let ranked = rank_uncovered_files(&input, "proj");
        assert_eq!(ranked[0].path, "src/deep/mod.rs");
    }

    #[test]
    fn ranking_is_idempotent() {
        let input = tree(vec![
            file("proj:a.rs", Some("a.rs"), vec![measure("new_uncovered_lines", "5")]),
            file("proj:b.rs", Some("b.rs"), vec![measure("new_uncovered_lines", "5")]),
            file("proj:c.rs", Some("c.rs"), vec![measure("new_uncovered_lines", "9")]),
        ]);

        let first = rank_uncovered_files(&input, "proj");
        let second = rank_uncovered_files(&input, "proj");
        assert_eq!(first, second);

        // Stable sort keeps equal counts in server order.
        assert_eq!(first[0].path, "c.rs");
        assert_eq!(first[1].path, "a.rs");
        assert_eq!(first[2].path, "b.rs");
    }
}
