use crate::TOOL_NAME;
use crate::report::model::{AnalysisStatus, Report, ReviewReport};
use crate::rules::catalog::RuleCatalog;

fn mark(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let local = &report.local;

    out.push_str(&format!("{} {}\n", TOOL_NAME, report.tool.version));
    out.push_str(&format!(
        "Document size: {} bytes\n",
        report.document.size_bytes
    ));

    if local.status == AnalysisStatus::Empty {
        out.push_str("Nothing to analyze.\n");
    } else {
        out.push_str(&format!(
            "Local score: {}/100 (minimum {}, {} of {} edicts passed)\n",
            local.total_score,
            local.minimum_score,
            local.passed_count(),
            local.edict_results.len()
        ));
        for r in local.edict_results.values() {
            out.push_str(&format!("  - {} [{}] {:>3}", r.edict_id, mark(r.passed), r.score));
            if let Some(feedback) = &r.feedback {
                out.push_str(&format!("  {feedback}"));
            }
            out.push('\n');
        }
    }
    out.push_str(&format!(
        "Eligible for review: {}\n",
        if local.can_submit { "yes" } else { "no" }
    ));

    match &report.review {
        None => {}
        Some(ReviewReport::Certified { result }) | Some(ReviewReport::NeedsRevision { result }) => {
            let verdict = if result.passed {
                "Certified"
            } else {
                "Needs revision"
            };
            out.push_str(&format!(
                "Review: {verdict} ({}/100, bar {})\n",
                result.total_score, result.passing_threshold
            ));
            out.push_str(&format!("  {}\n", result.feedback));
            for r in result.edict_results.values() {
                out.push_str(&format!(
                    "  - {} [{}] {:>3}  {}\n",
                    r.edict_id,
                    mark(r.passed),
                    r.score,
                    r.feedback
                ));
            }
        }
        Some(ReviewReport::Failed { error }) => {
            out.push_str(&format!("Review: failed ({error}); try again\n"));
        }
        Some(ReviewReport::Refused { reason }) => {
            out.push_str(&format!("Review: not submitted ({reason})\n"));
        }
    }
    out
}

pub fn render_catalog(catalog: &RuleCatalog) -> String {
    let mut out = String::new();
    for pillar in catalog.pillars() {
        out.push_str(&format!("{} {}\n", pillar.id, pillar.name));
        for e in &pillar.edicts {
            out.push_str(&format!(
                "  {} {} (threshold {}, weight {}, {:?})\n",
                e.id, e.name, e.threshold, e.weight, e.affinity
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{
        DocumentInfo, EdictResult, LocalValidationResult, RemoteValidationResult, ToolInfo,
    };
    use crate::rules::catalog::EdictId;
    use std::collections::BTreeMap;

    fn report(review: Option<ReviewReport>) -> Report {
        let mut local = LocalValidationResult::empty("f".into(), 85);
        local.status = AnalysisStatus::Ok;
        local.total_score = 91;
        local.can_submit = true;
        local.edict_results.insert(
            EdictId(1),
            EdictResult {
                edict_id: EdictId(1),
                passed: true,
                score: 100,
                feedback: Some("Great job!".into()),
                highlights: vec![],
            },
        );
        Report::new(
            ToolInfo {
                name: "copycert".into(),
                version: "0.1.0".into(),
            },
            DocumentInfo {
                path: None,
                size_bytes: 12,
                fingerprint: "f".into(),
            },
            local,
            review,
        )
    }

    #[test]
    fn text_lists_edicts_and_eligibility() {
        let text = render_text(&report(None));
        assert!(text.contains("Local score: 91/100"));
        assert!(text.contains("E01 [PASS] 100  Great job!"));
        assert!(text.contains("Eligible for review: yes"));
        assert!(!text.contains("Review:"));
    }

    #[test]
    fn text_shows_review_verdict() {
        let result = RemoteValidationResult {
            total_score: 93,
            passing_threshold: 90,
            passed: true,
            feedback: "Certified.".into(),
            edict_results: BTreeMap::new(),
        };
        let text = render_text(&report(Some(ReviewReport::Certified { result })));
        assert!(text.contains("Review: Certified (93/100, bar 90)"));

        let text = render_text(&report(Some(ReviewReport::Refused {
            reason: "too low".into(),
        })));
        assert!(text.contains("not submitted (too low)"));
    }

    #[test]
    fn text_lines_end_with_newlines() {
        let mut r = report(None);
        r.local.edict_results.get_mut(&EdictId(1)).unwrap().feedback = None;
        let text = render_text(&r);
        assert!(text.contains("E01 [PASS] 100\nEligible for review: yes\n"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn catalog_lists_every_edict() {
        let text = render_catalog(&RuleCatalog::standard());
        assert!(text.starts_with("P1 "));
        assert!(text.contains("E05 Comma Usage (threshold 80, weight 2, Local)"));
        assert_eq!(text.lines().filter(|l| l.starts_with("  E")).count(), 21);
    }
}
