use pojo_core::{Pojo, PojoMap, PojoName, PojoValue};
use pojo_reflect::{NodeKind, PojoError, PojoNode, PojoPath};
use pojo_testhelpers::test;

use crate::fixtures::{Person, context};

#[test]
fn basic_values_have_no_children() {
    let basics = [
        PojoValue::Null,
        PojoValue::Int(3),
        PojoValue::Double(1.5),
        PojoValue::from("text"),
        PojoValue::Char('x'),
        PojoValue::Class(Person::pojo_class()),
    ];
    for value in basics {
        let node = PojoNode::wrap("leaf", value, context());
        assert_eq!(node.kind(), NodeKind::Basic);
        assert_eq!(node.child_count().unwrap(), 0);
        assert!(node.children().unwrap().is_empty());
        assert_eq!(
            node.child(0).unwrap_err(),
            PojoError::IndexOutOfBounds { index: 0, len: 0 }
        );
    }
}

#[test]
fn root_has_no_index_or_path() {
    let root = PojoNode::wrap("root", PojoValue::Int(1), context());
    assert!(root.is_root());
    assert_eq!(root.index(), None);
    assert!(root.parent().is_none());
    assert!(root.path().is_empty());
    assert_eq!(root.name(), "root");
}

#[test]
fn list_children_values_in_order() {
    let list = PojoValue::list([PojoValue::from("a"), PojoValue::Int(2), PojoValue::Null]);
    let node = PojoNode::wrap("list", list, context());

    assert_eq!(node.kind(), NodeKind::List);
    let values = node.children_values().unwrap();
    assert_eq!(
        &*values,
        &[PojoValue::from("a"), PojoValue::Int(2), PojoValue::Null]
    );
}

#[test]
fn array_children_are_named_by_index() {
    let node = PojoNode::wrap("scores", PojoValue::array(vec![10i64, 20, 30]), context());
    assert!(matches!(node.kind(), NodeKind::Array(_)));

    let children = node.children().unwrap();
    assert_eq!(children.len(), 3);
    for (i, child) in children.iter().enumerate() {
        assert_eq!(child.index(), Some(i));
        assert_eq!(child.name(), &PojoName::index(i));
        assert!(PojoName::is_same(child.name(), &PojoName::index(i)));
    }
    assert_eq!(children[2].value(), &PojoValue::Long(30));
}

#[test]
fn children_are_memoized() {
    let node = PojoNode::wrap("scores", PojoValue::array(vec![1, 2]), context());
    let first = node.child(1).unwrap();
    let second = node.child(1).unwrap();
    assert!(PojoNode::ptr_eq(&first, &second));
}

#[test]
fn object_children_are_properties_in_name_order() {
    let node = PojoNode::wrap("person", PojoValue::object(Person::alice()), context());
    assert_eq!(node.kind(), NodeKind::Object);

    let names: Vec<String> = node
        .children()
        .unwrap()
        .iter()
        .map(|child| child.name().to_string())
        .collect();
    assert_eq!(names, ["active", "age", "id", "name", "scores", "tags"]);

    let name = node.child_by_name("name").unwrap();
    assert_eq!(name.value(), &PojoValue::from("Alice"));
    assert_eq!(name.index(), Some(3));
    assert_eq!(
        node.child_by_name("active").unwrap().value(),
        &PojoValue::Boolean(true)
    );
}

#[test]
fn missing_child_name() {
    let node = PojoNode::wrap("person", PojoValue::object(Person::alice()), context());
    assert_eq!(
        node.child_by_name("email").unwrap_err(),
        PojoError::NoSuchChild {
            name: PojoName::property("email")
        }
    );

    let list = PojoNode::wrap("list", PojoValue::list([PojoValue::Int(1)]), context());
    assert_eq!(
        list.child_by_name(4usize).unwrap_err(),
        PojoError::NoSuchChild {
            name: PojoName::index(4)
        }
    );
}

#[test]
fn map_children_are_entries() {
    let map = PojoValue::map([
        (PojoValue::from("a"), PojoValue::Int(1)),
        (PojoValue::from("b"), PojoValue::Int(2)),
    ]);
    let node = PojoNode::wrap("map", map, context());
    assert_eq!(node.kind(), NodeKind::Map);
    assert_eq!(node.child_count().unwrap(), 2);

    let entry = node.child(1).unwrap();
    assert_eq!(entry.kind(), NodeKind::Entry);
    assert_eq!(entry.value(), &PojoValue::entry("b", PojoValue::Int(2)));

    let children = entry.children().unwrap();
    assert_eq!(children[0].name(), "key");
    assert_eq!(children[0].value(), &PojoValue::from("b"));
    assert_eq!(children[1].name(), "value");
    assert_eq!(children[1].value(), &PojoValue::Int(2));
}

#[test]
fn paths_and_resolve() {
    let root = PojoNode::wrap("person", PojoValue::object(Person::alice()), context());
    let score = root
        .child_by_name("scores")
        .unwrap()
        .child(1)
        .unwrap();
    assert_eq!(score.path().to_string(), "scores[1]");
    assert_eq!(score.value(), &PojoValue::Int(5));

    let path = PojoPath::parse("tags[0]").unwrap();
    let tag = root.resolve(&path).unwrap();
    assert_eq!(tag.value(), &PojoValue::from("admin"));
    assert_eq!(tag.path(), path);
    assert!(PojoNode::ptr_eq(&tag.root(), &root));
}

#[test]
fn equality_is_by_value() {
    let a = PojoNode::wrap("a", PojoValue::array(vec![1.0f64, f64::NAN]), context());
    let b = PojoNode::wrap("b", PojoValue::array(vec![1.0f64, f64::NAN]), context());
    assert_eq!(a, b);

    let c = PojoNode::wrap("c", PojoValue::array(vec![1.0f64, 2.0]), context());
    assert_ne!(a, c);
}

#[test]
fn map_holding_itself_prints_once() {
    let map = PojoMap::new();
    map.insert(PojoValue::from("me"), PojoValue::Map(map.clone()));
    let root = PojoNode::wrap("map", PojoValue::Map(map), context());

    let entry = root.child(0).unwrap();
    assert_eq!(entry.value().to_string(), "me={me=(this Map)}");
    assert!(format!("{root:?}").contains("(this Map)"));
}
