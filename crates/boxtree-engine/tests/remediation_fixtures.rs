use boxtree_engine::{
    FailurePolicy, Remediation, Vocabulary, apply_plan, load_document, snapshot,
};
use insta::assert_snapshot;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

#[test]
fn fixture_article_loads() {
    let root = load_document(&fixture("article.json")).unwrap();
    snapshot::invariants(&root);

    assert_snapshot!(snapshot::outline(&root), @r#"
    block body
      block div class="title"
        block p
          inline b "Chapter 1"
        block p
          inline "The Voyage Out"
      block table
        block tr
          block td
            inline "First column"
          block td
            inline "Second column"
          block td
            inline "Third column"
      block p
        inline "It was a dark night "
        inline img src="ornament.png" alt="" [replaced]
    "#);
}

#[test]
fn fixture_article_plan() {
    let root = load_document(&fixture("article.json")).unwrap();
    let plan: Vec<Remediation> = serde_json::from_str(&fixture("article.plan.json")).unwrap();

    let report = apply_plan(root.clone(), &plan, &Vocabulary::default(), FailurePolicy::Abort);
    assert_eq!(report.applied, vec![0, 1, 2]);
    let remediated = report.into_result().unwrap();
    snapshot::invariants(&remediated);

    assert_snapshot!(snapshot::outline(&remediated), @r#"
    block body
      block h1 class="title"
        block p
          inline "Chapter 1"
        block p
          inline "The Voyage Out"
      block div
        block div
          inline "First column"
        block div
          inline "Second column"
        block div
          inline "Third column"
      block p
        inline "It was a dark night "
        inline span src="ornament.png" alt="" [replaced]
    "#);

    // the input document is untouched
    assert_eq!(root.children().next().unwrap().local_name(), Some("div"));
}

#[test]
fn fixture_article_plan_failure_reports_step() {
    let root = load_document(&fixture("article.json")).unwrap();
    let plan = [
        Remediation::Heading {
            first_block: 0,
            block_count: 2,
        },
        // the paragraph text is not an image
        Remediation::DecorativeImage {
            block: 5,
            inline: Some(0),
        },
    ];

    let report = apply_plan(root, &plan, &Vocabulary::default(), FailurePolicy::Abort);
    assert_eq!(report.applied, vec![0]);
    assert_eq!(
        report.root.children().next().unwrap().local_name(),
        Some("h1")
    );
    let error = report.into_result().unwrap_err();
    assert_eq!(error.index, 1);
    assert_eq!(
        error.to_string(),
        "remediation step 1 (DecorativeImage { block: 5, inline: Some(0) }) failed: \
         transformation precondition failed: inline content is not an image"
    );
}
