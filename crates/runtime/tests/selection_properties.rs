use domqueue_core::{Document, DomErrorKind, Node, Value};
use domqueue_document::MemoryDocument;
use domqueue_runtime::capability::class::{add_class, toggle_class};
use domqueue_runtime::{
    AttrsExt, CapabilityError, ClassExt, DataExt, Invocation, Operation, Scope, Selection,
    TextExt, TraverseExt, select,
};
use rstest::{fixture, rstest};
use std::sync::{Arc, Mutex};

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Document Test</title>
</head>
<body>
    <div id="id-1" class="class-1 a" data-id="data-id-1">text-A</div>
    <div id="id-2" class="class-1 a" data-id="data-id-2">text-B</div>
    <div id="id-3" class="class-2 class-3 a">text-C</div>
    <ul id="list-1"><li>1</li><li class="mid">2</li><li>3</li></ul>
    <ul id="list-2"><li>4</li><li class="mid">5</li><li>6</li></ul>
</body>
</html>"#;

#[fixture]
fn document() -> MemoryDocument {
    MemoryDocument::parse(PAGE).expect("fixture markup parses")
}

fn markup(document: &MemoryDocument) -> String {
    document.outer_markup().expect("markup serializes")
}

fn ids(nodes: &[domqueue_core::NodeRef]) -> Vec<String> {
    nodes.iter().map(|node| node.attribute("id").unwrap_or_default()).collect()
}

#[rstest]
fn selecting_by_id_yields_exactly_that_node(document: MemoryDocument) {
    let selection = select("#id-2", &document);
    let expected = document.get_element_by_id("id-2").unwrap();
    assert_eq!(selection.len(), 1);
    assert_eq!(selection.nodes()[0].node_id(), expected.id());

    assert!(select("#missing", &document).is_empty());
}

#[rstest]
fn class_and_query_selection_follow_document_order(document: MemoryDocument) {
    let by_class = select(".a", &document);
    assert_eq!(by_class.text(), vec!["text-A", "text-B", "text-C"]);
    assert_eq!(ids(by_class.nodes()), ids(&document.elements_by_class_name("a")));

    let by_query = select("*[id]", &document);
    assert_eq!(ids(by_query.nodes()), vec!["id-1", "id-2", "id-3", "list-1", "list-2"]);
    assert_eq!(ids(by_query.nodes()), ids(&document.query_selector_all("[id]").unwrap()));
}

#[rstest]
fn class_selection_requires_every_listed_class(document: MemoryDocument) {
    assert_eq!(select(".class-3 class-2", &document).text(), vec!["text-C"]);
}

#[rstest]
#[case("")]
#[case("div")]
#[case("#")]
#[case(".")]
#[case("*")]
#[case("*[")]
#[case("*p::after")]
fn unrecognized_or_malformed_queries_select_nothing(document: MemoryDocument, #[case] query: &str) {
    assert!(select(query, &document).is_empty());
}

#[rstest]
fn mutators_leave_the_document_alone_until_flush(document: MemoryDocument) {
    let before = markup(&document);

    let selection = select(".class-1", &document)
        .add_class(["x"])
        .remove_class(["a"])
        .set_text("t")
        .set_attr("title", "y")
        .set_data([("userId", "1")]);

    assert_eq!(markup(&document), before);
    assert_eq!(selection.queue().len(), 5);

    let report = selection.flush().into_result().unwrap();
    assert_eq!(report.applied, 10);
    let first = document.get_element_by_id("id-1").unwrap();
    assert_eq!(first.attribute("class").as_deref(), Some("class-1 x"));
    assert_eq!(first.attribute("data-user-id").as_deref(), Some("1"));
    assert_eq!(first.text_content(), "t");
}

#[rstest]
fn flush_runs_all_operations_on_one_node_before_the_next(document: MemoryDocument) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let marker = |name: &'static str| {
        let log = Arc::clone(&log);
        Operation::new(name, move |node| {
            let id = node.attribute("id").unwrap_or_default();
            log.lock().unwrap().push(format!("{name}({id})"));
            Ok(())
        })
    };

    let _ = select(".class-1", &document).enqueue(marker("A")).enqueue(marker("B")).flush();

    assert_eq!(*log.lock().unwrap(), vec!["A(id-1)", "B(id-1)", "A(id-2)", "B(id-2)"]);
}

#[rstest]
fn accessors_read_current_state_and_never_queue(document: MemoryDocument) {
    let selection = select(".class-1", &document).add_class(["x"]);
    assert_eq!(selection.has_class("x"), vec![false, false]);
    assert_eq!(selection.text(), vec!["text-A", "text-B"]);
    assert_eq!(selection.queue().len(), 1);

    document.get_element_by_id("id-1").unwrap().set_text_content("changed").unwrap();
    assert_eq!(selection.text(), vec!["changed", "text-B"]);

    let _ = selection.flush();
    assert_eq!(selection.has_class("x"), vec![true, true]);
    assert_eq!(selection.queue().len(), 1);
}

#[rstest]
fn attribute_and_data_accessors_keep_declaration_order(document: MemoryDocument) {
    let selection = select("#id-1", &document);

    let attrs = selection.attrs();
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0].keys().collect::<Vec<_>>(), vec!["id", "class", "data-id"]);

    let data = selection.data();
    assert_eq!(data[0].get("id"), Some("data-id-1"));
    assert_eq!(data[0].len(), 1);
}

#[rstest]
fn children_concatenate_per_parent_in_order(document: MemoryDocument) {
    let lists = select("*ul", &document);
    assert_eq!(lists.len(), 2);

    let items = lists.children();
    assert_eq!(items.text(), vec!["1", "2", "3", "4", "5", "6"]);

    let grandchildren = items.children();
    assert!(grandchildren.is_empty());
}

#[rstest]
#[case(".mid", &["2", "5"])]
#[case("li:first-child", &["1", "4"])]
#[case("[", &[])]
fn children_filter_keeps_matching_children(
    document: MemoryDocument,
    #[case] filter: &str,
    #[case] expected: &[&str],
) {
    assert_eq!(select("*ul", &document).children_matching(filter).text(), expected);
}

#[rstest]
fn structural_steps_keep_the_queue(document: MemoryDocument) {
    let _ = select("#list-1", &document).add_class(["seen"]).children().flush();

    assert!(!document.get_element_by_id("list-1").unwrap().has_class("seen"));
    assert_eq!(document.elements_by_class_name("seen").len(), 3);
}

#[rstest]
fn flushing_twice_reapplies_every_operation(document: MemoryDocument) {
    let before = markup(&document);
    let selection = select(".class-1", &document).toggle_class(["x"]);

    let _ = selection.flush();
    assert_eq!(selection.has_class("x"), vec![true, true]);

    let _ = selection.flush();
    assert_eq!(selection.has_class("x"), vec![false, false]);
    assert_eq!(markup(&document), before);
}

#[rstest]
fn add_then_toggle_cancels_out_per_node(document: MemoryDocument) {
    let untouched = document.deep_clone();

    let report = select(".a", &document)
        .enqueue(add_class(["x"]))
        .enqueue(toggle_class(["x"]))
        .flush();

    assert!(report.is_success());
    assert_eq!(report.applied, 6);
    assert_eq!(select(".a", &document).has_class("x"), vec![false, false, false]);
    assert_eq!(markup(&document), markup(&untouched));
}

#[rstest]
#[case::add_single(".class-1", "add_class", &["class-X"], |n: &dyn Node| n.add_class("class-X").unwrap())]
#[case::add_multiple(".class-1", "add_class", &["class-Y", "class-Z"], |n: &dyn Node| {
    n.add_class("class-Y").unwrap();
    n.add_class("class-Z").unwrap();
})]
#[case::remove_single(".class-2", "remove_class", &["class-3"], |n: &dyn Node| n.remove_class("class-3").unwrap())]
#[case::remove_multiple(".class-2", "remove_class", &["class-2", "class-3"], |n: &dyn Node| {
    n.remove_class("class-2").unwrap();
    n.remove_class("class-3").unwrap();
})]
#[case::toggle_on(".class-1", "toggle_class", &["class-Y", "class-Z"], |n: &dyn Node| {
    n.toggle_class("class-Y").unwrap();
    n.toggle_class("class-Z").unwrap();
})]
#[case::toggle_off(".class-2", "toggle_class", &["class-2", "class-3"], |n: &dyn Node| {
    n.toggle_class("class-2").unwrap();
    n.toggle_class("class-3").unwrap();
})]
#[case::set_text("*[id]", "text", &["text-M"], |n: &dyn Node| n.set_text_content("text-M").unwrap())]
fn named_mutators_match_manual_document_edits(
    document: MemoryDocument,
    #[case] query: &str,
    #[case] capability: &str,
    #[case] args: &[&str],
    #[case] manual: fn(&dyn Node),
) {
    let expected = document.deep_clone();
    for node in select(query, &expected).nodes() {
        manual(node.as_ref());
    }

    let selection = select(query, &document).invoke(capability, args).unwrap().into_selection().unwrap();
    let report = selection.flush().into_result().unwrap();

    assert_eq!(report.applied, selection.len());
    assert_eq!(markup(&document), markup(&expected));
}

#[rstest]
fn failing_node_skips_its_remaining_operations_only(document: MemoryDocument) {
    let fail_on_second = Operation::new("fail_on_second", |node| {
        if node.attribute("id").as_deref() == Some("id-2") {
            node.set_attribute("bad name", "x")
        } else {
            Ok(())
        }
    });

    let report = select("*div", &document)
        .add_class(["ok"])
        .enqueue(fail_on_second)
        .add_class(["after"])
        .flush();

    assert_eq!(report.applied, 7);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.node_index, 1);
    assert_eq!(failure.operation, "fail_on_second");
    assert_eq!(failure.error.kind, DomErrorKind::InvalidName);

    let second = document.get_element_by_id("id-2").unwrap();
    assert!(second.has_class("ok"));
    assert!(!second.has_class("after"));
    assert!(document.get_element_by_id("id-3").unwrap().has_class("after"));

    let err = report.into_result().unwrap_err();
    assert_eq!(err.report.failures.len(), 1);
}

#[rstest]
fn invalid_tokens_fail_on_every_node(document: MemoryDocument) {
    let before = markup(&document);
    let report = select(".class-1", &document).add_class([""]).flush();

    assert_eq!(report.failures.len(), 2);
    assert!(report.failures.iter().all(|failure| failure.error.kind == DomErrorKind::InvalidToken));
    assert_eq!(markup(&document), before);
}

#[rstest]
fn scope_binds_a_default_document_and_accepts_other_contexts(document: MemoryDocument) {
    let scope = Scope::new(&document);
    let second_list = document.get_element_by_id("list-2").unwrap();
    let context: &dyn Document = &second_list;

    assert_eq!(scope.select("#id-1").len(), 1);
    assert_eq!(scope.select_within("*li", None).len(), 6);
    assert_eq!(scope.select_within("*li", Some(context)).text(), vec!["4", "5", "6"]);
    assert_eq!(scope.select_within(".mid", Some(context)).text(), vec!["5"]);
    assert!(scope.select_within("#id-1", Some(context)).is_empty());
}

#[rstest]
fn accessors_are_available_by_name(document: MemoryDocument) {
    let values = select(".class-1", &document).invoke("has_class", &["class-1"]).unwrap();
    let Invocation::Values(values) = values else {
        panic!("has_class is an accessor");
    };
    assert_eq!(values, vec![Value::Bool(true), Value::Bool(true)]);

    let texts = select("#id-3", &document).invoke("text", &[]).unwrap().into_values().unwrap();
    assert_eq!(texts, vec![Value::from("text-C")]);

    let attrs = select("#id-3", &document).invoke("attrs", &[]).unwrap().into_values().unwrap();
    assert_eq!(attrs[0].as_entries().and_then(|entries| entries.get("class")), Some("class-2 class-3 a"));
}

#[rstest]
fn data_mutator_writes_kebab_case_attributes(document: MemoryDocument) {
    let selection = select("#id-3", &document).invoke("data", &["lastSeen=now"]).unwrap();
    let report = selection.into_selection().unwrap().flush();
    assert!(report.is_success());

    let node = document.get_element_by_id("id-3").unwrap();
    assert_eq!(node.attribute("data-last-seen").as_deref(), Some("now"));
}

#[rstest]
#[case("text", &["a", "b"])]
#[case("add_class", &[])]
#[case("has_class", &[])]
#[case("children", &["a", "b"])]
fn arity_violations_are_rejected(document: MemoryDocument, #[case] name: &str, #[case] args: &[&str]) {
    let err = select(".a", &document).invoke(name, args).unwrap_err();
    assert!(matches!(err, CapabilityError::Arity { actual, .. } if actual == args.len()));
}

#[rstest]
fn malformed_assignments_are_rejected(document: MemoryDocument) {
    let err = select(".a", &document).invoke("attrs", &["novalue"]).unwrap_err();
    assert!(matches!(err, CapabilityError::InvalidArgument { name: "attrs", .. }));
}

#[rstest]
fn duplicate_nodes_are_kept_and_visited_once_per_entry(document: MemoryDocument) {
    let list = document.element_by_id("list-1").unwrap();
    let twice = Selection::new(vec![Arc::clone(&list), list]);
    assert_eq!(twice.len(), 2);

    let items = twice.clone().children();
    assert_eq!(items.text(), vec!["1", "2", "3", "1", "2", "3"]);

    let report = items.toggle_class(["z"]).flush();
    assert_eq!(report.applied, 6);
    assert!(document.query_selector_all("li.z").unwrap().is_empty());

    let report = twice.add_class(["seen"]).set_attr("title", "x").flush();
    assert_eq!(report.applied, 4);
    let list = document.get_element_by_id("list-1").unwrap();
    assert_eq!(list.attribute("class").as_deref(), Some("seen"));
}
