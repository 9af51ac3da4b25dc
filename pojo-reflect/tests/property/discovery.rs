use std::sync::{Arc, LazyLock};

use pojo_core::{Pojo, PojoClass, PojoObject, PojoValue, TypeRef};
use pojo_reflect::{
    PojoNodeContext, PojoProperty, ReflectiveContext, SetterKind, discover_properties,
};
use pojo_testhelpers::test;

use crate::fixtures::{Label, Person, Point};

fn summary(properties: &[Arc<dyn PojoProperty>]) -> Vec<String> {
    properties
        .iter()
        .map(|p| format!("{}: {} {:?}", p.name(), p.value_type(), p.setter_kind()))
        .collect()
}

#[test]
fn bean_properties_sorted_by_name() {
    let properties = discover_properties(Person::pojo_class());
    insta::assert_debug_snapshot!(summary(&properties), @r#"
    [
        "active: boolean Some(InPlace)",
        "age: int Some(InPlace)",
        "id: long None",
        "name: String Some(InPlace)",
        "scores: int[] Some(InPlace)",
        "tags: List Some(InPlace)",
    ]
    "#);
    assert!(properties[2].is_read_only());
}

#[test]
fn discovery_is_deterministic() {
    let first = summary(&discover_properties(Person::pojo_class()));
    let second = summary(&discover_properties(Person::pojo_class()));
    assert_eq!(first, second);
}

#[test]
fn withers_are_recognized() {
    let properties = discover_properties(Point::pojo_class());
    assert_eq!(properties.len(), 2);
    for property in &properties {
        assert_eq!(property.setter_kind(), Some(SetterKind::Wither));
    }

    let origin = PojoObject::new(Point { x: 0, y: 0 });
    let moved = properties[0].set(&origin, PojoValue::Int(3)).unwrap();
    assert_eq!(moved.downcast_ref::<Point>(), Some(&Point { x: 3, y: 0 }));
    assert_eq!(origin.downcast_ref::<Point>(), Some(&Point { x: 0, y: 0 }));
}

#[test]
fn record_accessors_and_ignored_methods() {
    let properties = discover_properties(Label::pojo_class());
    assert_eq!(summary(&properties), ["text: String Some(InPlace)"]);
}

#[derive(Clone, Debug, PartialEq)]
struct Switch {
    on: bool,
    label: String,
    set_through: &'static str,
}

impl Pojo for Switch {
    fn pojo_class() -> &'static PojoClass {
        static CLASS: LazyLock<PojoClass> = LazyLock::new(|| {
            PojoClass::builder::<Switch>("Switch")
                // `isOn` loses to `getOn`
                .getter("isOn", TypeRef::Boolean, |s| s.on.into())
                .getter("getOn", TypeRef::String, |s| {
                    PojoValue::from(if s.on { "yes" } else { "no" })
                })
                // not boolean, so a bare accessor named `isLabel`
                .getter("isLabel", TypeRef::String, |s| s.label.as_str().into())
                .getter("getLabel", TypeRef::String, |s| s.label.as_str().into())
                // the exact parameter type wins over `Object`
                .setter("setLabel", TypeRef::Object, |s, v| {
                    s.label = String::try_from(v)?;
                    s.set_through = "object";
                    Ok(())
                })
                .setter("setLabel", TypeRef::String, |s, v| {
                    s.label = String::try_from(v)?;
                    s.set_through = "exact";
                    Ok(())
                })
                // parameter type does not match the getter
                .setter("setOn", TypeRef::Int, |s, v| {
                    s.on = i32::try_from(v)? != 0;
                    Ok(())
                })
                .build()
        });
        &CLASS
    }
}

#[test]
fn getter_priority_and_setter_matching() {
    let properties = discover_properties(Switch::pojo_class());
    insta::assert_debug_snapshot!(summary(&properties), @r#"
    [
        "isLabel: String None",
        "label: String Some(InPlace)",
        "on: String None",
    ]
    "#);

    let switch = PojoObject::new(Switch {
        on: true,
        label: "a".into(),
        set_through: "",
    });
    let relabeled = properties[1].set(&switch, PojoValue::from("b")).unwrap();
    let relabeled = relabeled.downcast_ref::<Switch>().unwrap();
    assert_eq!(relabeled.label, "b");
    assert_eq!(relabeled.set_through, "exact");

    assert_eq!(properties[2].get(&switch).unwrap(), PojoValue::from("yes"));
}

#[test]
fn context_caches_per_class() {
    let context = ReflectiveContext::new();
    assert_eq!(context.cached_classes(), 0);

    let first = context.properties(Person::pojo_class());
    let second = context.properties(Person::pojo_class());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(context.cached_classes(), 1);

    context.properties(Point::pojo_class());
    assert_eq!(context.cached_classes(), 2);
}
