//! End-to-end compilation of class diagrams to Graphviz markup

use suml::plugins::class::{ArrowHead, ClassPart, LineStyle};
use suml::{compile_class, parse_class, Database};

fn edge_of(input: &str) -> (ArrowHead, ArrowHead, LineStyle) {
    let db = parse_class(input).unwrap();
    match db.statements()[0].triple() {
        Some((_, ClassPart::Edge { left, right, style }, _)) => (left.arrow, right.arrow, *style),
        other => panic!("Expected an edge statement, got {:?}", other),
    }
}

#[test]
fn test_aggregation_end_to_end() {
    let dot = compile_class("[Customer]<>-[Order]").unwrap();
    let expected = r#"digraph G {
    ranksep = 1
    rankdir = LR
    node [
        shape = "record"
        height = 0.50
        fontsize = 10
        margin = "0.20,0.05"
    ]
    A000 [
        label = "Customer"
    ]
    node [
        shape = "record"
        height = 0.50
        fontsize = 10
        margin = "0.20,0.05"
    ]
    A001 [
        label = "Order"
    ]
    edge [
        dir = "both"
        style = "solid"
        arrowtail = "odiamond"
        taillabel = ""
        arrowhead = "none"
        headlabel = ""
        labeldistance = 2
        fontsize = 10
    ]
    A000 -> A001
}
"#;
    assert_eq!(dot, expected);
}

#[test]
fn test_arrow_table_left_side() {
    let cases = [
        ("[A]<>-[B]", ArrowHead::ODiamond),
        ("[A]++-[B]", ArrowHead::Diamond),
        ("[A]+-[B]", ArrowHead::ODiamond),
        ("[A]<-[B]", ArrowHead::Vee),
        ("[A]>-[B]", ArrowHead::Vee),
        ("[A]^-[B]", ArrowHead::Empty),
        ("[A]-[B]", ArrowHead::None),
    ];
    for (input, expected) in cases {
        let (left, right, style) = edge_of(input);
        assert_eq!(left, expected, "left end of {}", input);
        assert_eq!(right, ArrowHead::None, "right end of {}", input);
        assert_eq!(style, LineStyle::Solid);
    }
}

#[test]
fn test_arrow_table_right_side() {
    let cases = [
        ("[A]-<>[B]", ArrowHead::ODiamond),
        ("[A]-++[B]", ArrowHead::Diamond),
        ("[A]-+[B]", ArrowHead::ODiamond),
        ("[A]-<[B]", ArrowHead::Vee),
        ("[A]->[B]", ArrowHead::Vee),
        ("[A]-^[B]", ArrowHead::Empty),
    ];
    for (input, expected) in cases {
        let (left, right, _) = edge_of(input);
        assert_eq!(left, ArrowHead::None, "left end of {}", input);
        assert_eq!(right, expected, "right end of {}", input);
    }
}

#[test]
fn test_bidirectional_and_dashed() {
    assert_eq!(
        edge_of("[Customer]<->[Order]"),
        (ArrowHead::Vee, ArrowHead::Vee, LineStyle::Solid)
    );
    assert_eq!(
        edge_of("[Customer]uses-.->[PaymentStrategy]"),
        (ArrowHead::None, ArrowHead::Vee, LineStyle::Dashed)
    );
}

#[test]
fn test_inheritance_shorthand() {
    let dot = compile_class("[Customer]^[Cool Customer]").unwrap();
    assert!(dot.contains("arrowtail = \"empty\""));
    assert!(dot.contains("arrowhead = \"none\""));
    assert!(dot.contains("label = \"Cool\\ Customer\""));
}

#[test]
fn test_cardinality_labels() {
    let dot = compile_class("[Customer]<1-1..2>[Address]").unwrap();
    assert!(dot.contains("taillabel = \"1\""));
    assert!(dot.contains("headlabel = \"1..2\""));
}

#[test]
fn test_six_statements_lay_out_top_down() {
    let dot = compile_class("[A]\n[B]\n[C]\n[D]\n[E]\n[F]").unwrap();
    assert!(dot.contains("rankdir = TB"));
}

#[test]
fn test_five_statements_lay_out_left_to_right() {
    let dot = compile_class("[A]\n[B]\n[C]\n[D]\n[E]").unwrap();
    assert!(dot.contains("rankdir = LR"));
}

#[test]
fn test_sections_braced_only_top_down() {
    let lr = compile_class("[Customer|Forename;Surname|Save()]").unwrap();
    assert!(lr.contains("label = \"Customer\\n|Forename\\nSurname\\n|Save()\\n\""));

    let td = compile_class("[Customer|Forename;Surname|Save()]\n[A]\n[B]\n[C]\n[D]\n[E]").unwrap();
    assert!(td.contains("label = \"{Customer\\n|Forename\\nSurname\\n|Save()\\n}\""));
}

#[test]
fn test_splash_of_colour() {
    let dot = compile_class("[Customer{bg:orange}]<>1->*[Order{bg:green}]").unwrap();
    assert!(dot.contains("fillcolor = \"orange\""));
    assert!(dot.contains("fillcolor = \"green\""));
    assert!(dot.contains("taillabel = \"1\""));
    assert!(dot.contains("arrowhead = \"vee\""));
    assert!(dot.contains("headlabel = \"*\""));
}

#[test]
fn test_notes_are_dashed() {
    let dot = compile_class("[Person]-[Address],[Address]-[note: Value Object]").unwrap();
    assert!(dot.contains("shape = \"note\""));
    let styles: Vec<_> = dot.lines().filter(|l| l.trim().starts_with("style =")).collect();
    assert_eq!(styles, vec!["        style = \"solid\"", "        style = \"dashed\""]);
}

#[test]
fn test_full_sample() {
    let input = "\
[Foo|valueProp]
[Foo]entityRef->[Bar]
[Foo]entityComp++->ownedBy[Baz]
[Foo]oneToMany->*[FooBar]
[Bar|name]
[FooBar|value]
[FooBar]^[Bar]
";
    let db = parse_class(input).unwrap();
    assert_eq!(db.statement_count(), 7);
    assert_eq!(db.box_count(), 4);
    assert_eq!(db.edge_count(), 4);

    let dot = compile_class(input).unwrap();
    assert!(dot.contains("rankdir = TB"));
    assert_eq!(dot.matches(" -> ").count(), 4);
    // Bar was first referenced bare, the later sectioned declaration wins.
    assert!(dot.contains("label = \"{Bar\\n|name\\n}\""));
}
