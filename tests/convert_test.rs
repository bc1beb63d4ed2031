use recphylo::{
    AnnotationIssue, ConvertError, ConvertOptions, EventTag, ReportError,
    SkeletonLayout, TreeRole, TreeSkeleton, annotate_gene_skeleton,
    convert_report, parse_report,
};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("reading {}: {err}", path.display()))
}

fn trimmed(lines: &[String]) -> Vec<&str> {
    lines.iter().map(|line| line.trim()).collect()
}

#[test]
fn test_speciation_only_document() {
    let conversion = convert_report(
        &fixture("speciation_only.txt"),
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(conversion.document, fixture("speciation_only.xml"));
    assert_eq!(conversion.summary.speciations, 2);
    assert_eq!(conversion.summary.leaves, 3);
    assert_eq!(conversion.summary.records(), 5);
    assert!(conversion.summary.issues.is_empty());
}

#[test]
fn test_duplication_on_unrooted_trees() {
    let conversion = convert_report(
        &fixture("duplication_unrooted.txt"),
        &ConvertOptions::default(),
    )
    .unwrap();
    let lines = trimmed(&conversion.lines);

    assert_eq!(lines.first(), Some(&"<recPhylo>"));
    assert_eq!(lines.last(), Some(&"</recPhylo>"));
    assert_eq!(
        lines.iter().filter(|line| **line == "<phylogeny rooted=\"false\">").count(),
        2
    );
    // Species (3 tips, 2 internal) plus gene (3 tips, 2 internal).
    assert_eq!(lines.iter().filter(|line| **line == "<clade>").count(), 10);
    assert_eq!(lines.iter().filter(|line| **line == "<eventsRec>").count(), 4);

    let ab = lines.iter().position(|line| *line == "<name>AB</name>").unwrap();
    assert_eq!(
        lines[ab + 1..ab + 4],
        [
            "<eventsRec>",
            "<duplication speciesLocation=\"X\"></duplication>",
            "</eventsRec>",
        ]
    );
    for leaf in ["a", "b", "c"] {
        let tag = format!("<leaf speciesLocation=\"{leaf}\"></leaf>");
        assert_eq!(lines.iter().filter(|line| **line == tag).count(), 1);
    }
    assert_eq!(conversion.summary.duplications, 1);
    assert!(conversion.summary.issues.is_empty());
}

#[test]
fn test_transfer_adds_branching_out_and_transfer_back() {
    let conversion =
        convert_report(&fixture("transfer.txt"), &ConvertOptions::default())
            .unwrap();
    let lines = trimmed(&conversion.lines);

    let m2 = lines.iter().position(|line| *line == "<name>m2</name>").unwrap();
    assert_eq!(
        lines[m2 + 1..m2 + 4],
        [
            "<eventsRec>",
            "<branchingOut speciesLocation=\"d\"></branchingOut>",
            "</eventsRec>",
        ]
    );

    // The receiving side joins m3's existing container, in front.
    let m3 = lines.iter().position(|line| *line == "<name>m3</name>").unwrap();
    assert_eq!(
        lines[m3 + 1..m3 + 5],
        [
            "<eventsRec>",
            "<transferBack destinationSpecies=\"n3\"></transferBack>",
            "<speciation speciesLocation=\"n3\"></speciation>",
            "</eventsRec>",
        ]
    );

    let summary = &conversion.summary;
    assert_eq!(
        (summary.transfers, summary.speciations, summary.leaves),
        (1, 2, 4)
    );
    assert_eq!(summary.transfer_backs, 1);
    assert_eq!(summary.records(), 7);
    assert!(summary.issues.is_empty());
}

#[test]
fn test_line_growth_per_record() {
    let report = parse_report(&fixture("transfer.txt")).unwrap();
    let layout = SkeletonLayout::default();
    let species =
        TreeSkeleton::build(report.species_tree(), TreeRole::Species, true)
            .unwrap();
    let mut gene =
        TreeSkeleton::build(report.gene_tree(), TreeRole::Gene, true).unwrap();
    let gene_tree = gene.tree().clone();
    let before = gene.render(&layout).unwrap().len();

    let summary = annotate_gene_skeleton(
        &mut gene,
        report.reconciliation(),
        &gene_tree,
        species.tree(),
    );

    // Seven new containers, plus one tag joining m3's.
    assert_eq!(gene.render(&layout).unwrap().len(), before + 7 * 3 + 1);
    assert_eq!(
        gene.events("m3"),
        [
            EventTag::TransferBack { destination_species: "n3".to_string() },
            EventTag::Speciation { species_location: "n3".to_string() },
        ]
    );
    assert!(summary.issues.is_empty());
}

#[test]
fn test_unplaceable_records_are_reported() {
    let content = "Species Tree:\n((a,b)n2,c)n1;\nGene Tree:\n((a_1,b_1)m2,c_1)m1;\n\
                   Reconciliation:\n\
                   a_1: Leaf Node.\n\
                   zz = LCA[a_1, b_1]: Speciation, Mapping --> n2\n\
                   m1 = LCA[a_1, c_1]: Transfer, Mapping --> n1, Recipient --> q\n\n";
    let conversion =
        convert_report(content, &ConvertOptions::default()).unwrap();
    let issues = &conversion.summary.issues;

    assert_eq!(issues.len(), 2);
    assert_eq!(
        issues[0],
        AnnotationIssue::UnresolvedNode {
            node: "zz".to_string(),
            role: TreeRole::Gene,
            event: "speciation",
        }
    );
    assert_eq!(
        issues[1],
        AnnotationIssue::AmbiguousRecipient {
            donor: "m1".to_string(),
            recipient: "q".to_string(),
            candidates: vec!["m2".to_string()],
            applied: vec![],
        }
    );
    assert_eq!(conversion.summary.records(), 3);
    assert!(!conversion.document.contains("<name>zz</name>"));
    assert!(conversion.document.contains(
        "<branchingOut speciesLocation=\"n1\"></branchingOut>"
    ));
}

#[test]
fn test_multiple_recipients_are_all_annotated_and_reported() {
    let content = "Species Tree:\n(((a,b)n3,c)n2,(d,e)n4)n1;\n\
                   Gene Tree:\n(((a_1,b_1)m3,(a_2,b_2)m4)m2,e_1)m1;\n\
                   Reconciliation:\n\
                   a_1: Leaf Node.\n\
                   b_1: Leaf Node.\n\
                   m3 = LCA[a_1, b_1]: Speciation, Mapping --> n3\n\
                   a_2: Leaf Node.\n\
                   b_2: Leaf Node.\n\
                   m4 = LCA[a_2, b_2]: Speciation, Mapping --> n3\n\
                   m2 = LCA[a_1, a_2]: Transfer, Mapping --> e, Recipient --> n3\n\n";
    let conversion =
        convert_report(content, &ConvertOptions::default()).unwrap();
    let summary = &conversion.summary;

    assert_eq!(summary.transfer_backs, 2);
    assert_eq!(
        summary.issues,
        [AnnotationIssue::AmbiguousRecipient {
            donor: "m2".to_string(),
            recipient: "n3".to_string(),
            candidates: vec!["m3".to_string(), "m4".to_string()],
            applied: vec!["m3".to_string(), "m4".to_string()],
        }]
    );

    let tag = "<transferBack destinationSpecies=\"n3\"></transferBack>";
    let lines = trimmed(&conversion.lines);
    assert_eq!(lines.iter().filter(|line| **line == tag).count(), 2);
}

#[test]
fn test_errors_name_the_failing_stage() {
    let missing_marker = "Species Tree:\n(a,b);\nGene Tree:\n(a,b);\n";
    let error =
        convert_report(missing_marker, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(
        error,
        ConvertError::Parse(ReportError::MissingMarker { .. })
    ));
    assert!(error.to_string().starts_with("parsing failed:"));

    let bad_gene_tree =
        "Species Tree:\n(a,b)r;\nGene Tree:\n((a_1,b_1;\nReconciliation:\n\n";
    let error =
        convert_report(bad_gene_tree, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(error, ConvertError::Tree { role: TreeRole::Gene, .. }));
    assert!(error.to_string().starts_with("parsing failed: gene tree:"));

    let bad_name =
        "Species Tree:\n('a\u{1}',b)r;\nGene Tree:\n(a_1,b_1)g;\nReconciliation:\n\n";
    let error =
        convert_report(bad_name, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(error, ConvertError::Serialization(_)));
    assert!(error.to_string().starts_with("serialization failed:"));
}
