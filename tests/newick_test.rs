use recphylo::{TreeParseError, parse_newick, parse_newick_tree};

#[test]
fn test_node_counts() {
    let test_cases = vec![
        ("Spec example species", "(A,(B,C));", 3, 5),
        ("Named internals", "((a,b)n2,c)n1;", 3, 5),
        ("Gene names with underscores", "((a_1,b_1)m2,c_1)m1;", 3, 5),
        ("Branch lengths", "((a:0.1,b:0.2)n2:0.3,c:0.4)n1;", 3, 5),
        ("Polytomy", "(a,b,c,d)r;", 4, 5),
        ("Whitespace and newline", "( a ,\n b ) r ;", 2, 3),
        ("Missing semicolon", "(a,b)r", 2, 3),
        ("Single node", "A;", 0, 1),
    ];

    for (name, newick, tips, total) in test_cases {
        println!("Testing: {}", name);
        let tree = parse_newick_tree(newick)
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_eq!(tree.tip_count_all(), tips, "Wrong tip count for {}", name);
        assert_eq!(tree.node_count_all(), total, "Wrong node count for {}", name);
        assert_eq!(tree.traverse().len(), total);
    }
}

#[test]
fn test_names_are_kept_verbatim() {
    let tree = parse_newick_tree("(('gene A':1,a_1)m2,c_1[&&NHX:S=c])m1;")
        .expect("tree");

    for name in ["gene A", "a_1", "m2", "c_1", "m1"] {
        assert!(tree.node_id_by_name(name).is_some(), "{} not indexed", name);
    }
    assert!(tree.node_id_by_name("a 1").is_none());
    assert!(tree.has_branch_lengths());

    let root = tree.first_node_id().expect("root");
    assert_eq!(tree.name(&root).as_deref(), Some("m1"));
    let child_names: Vec<String> = tree
        .children(&root)
        .iter()
        .filter_map(|node| node.name().map(|name| name.to_string()))
        .collect();
    assert_eq!(child_names, ["m2", "c_1"]);
}

#[test]
fn test_comments_are_free_text() {
    let test_cases = vec![
        ("Apostrophe in comment", "(a[it's],b)r;"),
        ("Quote in comment", "(a,b[say \"hi])r;"),
        ("Paren in comment", "(a[note: (x],b)r;"),
    ];

    for (name, newick) in test_cases {
        println!("Testing: {}", name);
        let tree = parse_newick_tree(newick)
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        for label in ["a", "b", "r"] {
            assert!(tree.node_id_by_name(label).is_some(), "{}: {}", name, label);
        }
        assert_eq!(tree.tip_count_all(), 2);
    }
}

#[test]
fn test_preorder_follows_input_order() {
    let tree = parse_newick_tree("((a,b)n2,(c,d)n3)n1;").expect("tree");
    let names: Vec<String> = tree
        .traverse()
        .iter()
        .filter_map(|id| tree.name(id).map(|name| name.to_string()))
        .collect();
    assert_eq!(names, ["n1", "n2", "a", "b", "n3", "c", "d"]);
}

#[test]
fn test_duplicate_names_resolve_to_first_in_preorder() {
    let tree = parse_newick_tree("((x,b)n2,x)n1;").expect("tree");
    let x = tree.node_id_by_name("x").expect("x");
    let n2 = tree.node_id_by_name("n2").expect("n2");
    assert_eq!(tree.parent_id(&x), Some(&n2));
}

#[test]
fn test_multiple_trees() {
    let trees = parse_newick("(a,b)r;\n(c,(d,e)s)t;").expect("trees");
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[1].tip_count_all(), 3);

    let first = parse_newick_tree("(a,b)r;\n(c,(d,e)s)t;").expect("tree");
    assert_eq!(first.tip_count_all(), 2);
}

#[test]
fn test_invalid_newick() {
    let test_cases = vec![
        ("Unclosed paren", "((a,b)n2,c;"),
        ("Extra close paren", "(a,b));"),
        ("Unclosed quote", "('a,b);"),
        ("Only a semicolon", ";"),
        ("Trailing garbage", "(a,b)r(c);"),
    ];

    for (name, newick) in test_cases {
        println!("Testing: {}", name);
        assert!(parse_newick_tree(newick).is_err(), "{} should fail", name);
    }

    assert!(matches!(parse_newick_tree("  "), Err(TreeParseError::EmptyInput)));
    assert!(matches!(parse_newick(""), Err(TreeParseError::EmptyInput)));
}
