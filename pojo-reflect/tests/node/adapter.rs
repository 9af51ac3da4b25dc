use pojo_core::{PojoMap, PojoSet, PojoValue};
use pojo_reflect::{PojoError, PojoNode};
use pojo_testhelpers::test;

use crate::fixtures::context;

fn map_of(keys: &[&str]) -> PojoMap {
    keys.iter()
        .enumerate()
        .map(|(i, key)| (PojoValue::from(*key), PojoValue::Int(i as i32)))
        .collect()
}

#[test]
fn map_modified_once_while_filling_recovers() {
    let map = map_of(&["a", "b"]);
    let node = PojoNode::wrap("map", PojoValue::Map(map.clone()), context());

    let first = node.child(0).unwrap();
    assert_eq!(first.value(), &PojoValue::entry("a", PojoValue::Int(0)));

    map.insert(PojoValue::from("c"), PojoValue::Int(2));
    let second = node.child(1).unwrap();
    assert_eq!(second.value(), &PojoValue::entry("b", PojoValue::Int(1)));
    assert_eq!(node.child(2).unwrap().value(), &PojoValue::entry("c", PojoValue::Int(2)));
}

#[test]
fn each_read_gets_its_own_restart() {
    let map = map_of(&["a", "b", "c"]);
    let node = PojoNode::wrap("map", PojoValue::Map(map.clone()), context());
    let first = node.child(0).unwrap();

    map.insert(PojoValue::from("d"), PojoValue::Int(3));
    node.child(1).unwrap();

    map.insert(PojoValue::from("e"), PojoValue::Int(4));
    assert_eq!(node.child(2).unwrap().value(), &PojoValue::entry("c", PojoValue::Int(2)));
    assert_eq!(node.child_count().unwrap(), 5);

    let updated = first.child(1).unwrap().set_value(PojoValue::Int(9)).unwrap();
    assert_eq!(updated.value(), &PojoValue::Int(9));
    let new_map = updated.parent().unwrap().parent().unwrap();
    assert_eq!(new_map.child_count().unwrap(), 5);
    assert_eq!(new_map.child(0).unwrap().value(), &PojoValue::entry("a", PojoValue::Int(9)));
}

#[test]
fn value_replacement_is_not_a_structural_change() {
    let map = map_of(&["a", "b"]);
    let node = PojoNode::wrap("map", PojoValue::Map(map.clone()), context());
    node.child(0).unwrap();

    map.insert(PojoValue::from("a"), PojoValue::Int(100));
    assert_eq!(node.child_count().unwrap(), 2);
}

#[test]
fn filled_children_stay_stable() {
    let set: PojoSet = [PojoValue::Int(1), PojoValue::Int(2)].into_iter().collect();
    let node = PojoNode::wrap("set", PojoValue::Set(set.clone()), context());
    assert_eq!(node.child_count().unwrap(), 2);

    set.insert(PojoValue::Int(3));
    assert_eq!(node.child_count().unwrap(), 2);

    let fresh = PojoNode::wrap("set", PojoValue::Set(set), context());
    assert_eq!(fresh.child_count().unwrap(), 3);
}

#[test]
fn updates_never_touch_the_live_collection() {
    let set: PojoSet = [PojoValue::Int(1), PojoValue::Int(2)].into_iter().collect();
    let node = PojoNode::wrap("set", PojoValue::Set(set.clone()), context());
    let before = set.version();

    let pushed = node.push_child(3).unwrap();
    assert_eq!(pushed.child_count().unwrap(), 3);
    assert_eq!(set.len(), 2);
    assert_eq!(set.version(), before);
}
