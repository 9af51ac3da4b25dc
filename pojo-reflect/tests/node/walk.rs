use core::fmt::Write;

use pojo_core::{PojoMap, PojoValue};
use pojo_reflect::{NodeKind, NodeVisitor, PojoNode, PojoPath, VisitDecision, WalkStatus, walk_node};
use pojo_testhelpers::test;

use crate::fixtures::{Line, Person, Point, context};

/// Renders every visited node on its own line, indented by depth.
#[derive(Default)]
struct Outline {
    out: String,
    skip: Option<&'static str>,
    stop_at: Option<&'static str>,
}

impl NodeVisitor for Outline {
    fn enter(&mut self, path: &PojoPath, node: &PojoNode) -> VisitDecision {
        let indent = "  ".repeat(path.len());
        let label = if path.is_empty() {
            node.name().to_string()
        } else {
            path.to_string()
        };
        if self.stop_at == Some(label.as_str()) {
            return VisitDecision::Stop;
        }
        let written = match node.kind() {
            NodeKind::Basic => writeln!(self.out, "{indent}{label} = {}", node.value()),
            kind => writeln!(self.out, "{indent}{label} ({kind})"),
        };
        written.unwrap();
        if self.skip == Some(label.as_str()) {
            VisitDecision::SkipChildren
        } else {
            VisitDecision::Recurse
        }
    }
}

#[test]
fn walks_depth_first_in_child_order() {
    let root = PojoNode::wrap("person", PojoValue::object(Person::alice()), context());
    let mut outline = Outline::default();
    assert_eq!(walk_node(&root, &mut outline).unwrap(), WalkStatus::Completed);
    insta::assert_snapshot!(outline.out, @r"
    person (object)
      active = true
      age = 30
      id = 7
      name = Alice
      scores (int[])
        scores[0] = 3
        scores[1] = 5
        scores[2] = 8
      tags (list)
        tags[0] = admin
        tags[1] = ops
    ");
}

#[test]
fn skip_and_stop() {
    let line = Line {
        start: Point { x: 1, y: 2 },
        end: Point { x: 3, y: 4 },
    };
    let root = PojoNode::wrap("line", PojoValue::object(line), context());

    let mut skipping = Outline {
        skip: Some("end"),
        ..Outline::default()
    };
    assert_eq!(walk_node(&root, &mut skipping).unwrap(), WalkStatus::Completed);
    insta::assert_snapshot!(skipping.out, @r"
    line (object)
      end (object)
      start (object)
        start.x = 1
        start.y = 2
    ");

    let mut stopping = Outline {
        stop_at: Some("start.y"),
        ..Outline::default()
    };
    assert_eq!(walk_node(&root, &mut stopping).unwrap(), WalkStatus::Stopped);
    assert!(stopping.out.ends_with("start.x = 1\n"));
}

#[test]
fn leave_follows_children() {
    #[derive(Default)]
    struct Order(Vec<String>);

    impl NodeVisitor for Order {
        fn enter(&mut self, path: &PojoPath, _node: &PojoNode) -> VisitDecision {
            self.0.push(format!("enter {path}"));
            VisitDecision::Recurse
        }

        fn leave(&mut self, path: &PojoPath, _node: &PojoNode) {
            self.0.push(format!("leave {path}"));
        }
    }

    let root = PojoNode::wrap("pair", PojoValue::entry("k", PojoValue::Int(1)), context());
    let mut order = Order::default();
    walk_node(&root, &mut order).unwrap();
    assert_eq!(
        order.0,
        ["enter ", "enter key", "leave key", "enter value", "leave value", "leave "]
    );
}

#[test]
fn map_holding_itself_is_not_reentered() {
    let map = PojoMap::new();
    map.insert(PojoValue::from("me"), PojoValue::Map(map.clone()));
    map.insert(PojoValue::from("n"), PojoValue::Int(1));

    let root = PojoNode::wrap("map", PojoValue::Map(map), context());
    let mut outline = Outline::default();
    assert_eq!(walk_node(&root, &mut outline).unwrap(), WalkStatus::Completed);
    insta::assert_snapshot!(outline.out, @r"
    map (map)
      [0] (entry)
        [0].key = me
        [0].value (map)
      [1] (entry)
        [1].key = n
        [1].value = 1
    ");
}
