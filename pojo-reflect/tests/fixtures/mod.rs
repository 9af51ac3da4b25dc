//! Reflective types shared by the integration tests.

use std::sync::{Arc, LazyLock};

use pojo_core::{
    ArrayKind, InvokeError, MethodBody, Pojo, PojoClass, PojoMethod, PojoValue, TypeRef,
};
use pojo_reflect::{PojoNodeContext, ReflectiveContext};

pub fn context() -> Arc<dyn PojoNodeContext> {
    ReflectiveContext::shared()
}

/// Bean-style accessors, one read-only property.
#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub active: bool,
    pub tags: Vec<String>,
    pub scores: Vec<i32>,
}

impl Person {
    pub fn alice() -> Self {
        Person {
            id: 7,
            name: "Alice".into(),
            age: 30,
            active: true,
            tags: vec!["admin".into(), "ops".into()],
            scores: vec![3, 5, 8],
        }
    }
}

impl Pojo for Person {
    fn pojo_class() -> &'static PojoClass {
        static CLASS: LazyLock<PojoClass> = LazyLock::new(|| {
            PojoClass::builder::<Person>("Person")
                .getter("getId", TypeRef::Long, |p| p.id.into())
                .getter("getName", TypeRef::String, |p| p.name.as_str().into())
                .setter("setName", TypeRef::String, |p, v| {
                    p.name = String::try_from(v)?;
                    Ok(())
                })
                .getter("getAge", TypeRef::Int, |p| p.age.into())
                .setter("setAge", TypeRef::Int, |p, v| {
                    p.age = i32::try_from(v)?;
                    Ok(())
                })
                .getter("isActive", TypeRef::Boolean, |p| p.active.into())
                .setter("setActive", TypeRef::Boolean, |p, v| {
                    p.active = bool::try_from(v)?;
                    Ok(())
                })
                .getter("getTags", TypeRef::List, |p| {
                    PojoValue::list(p.tags.iter().map(|tag| PojoValue::from(tag.as_str())))
                })
                .setter("setTags", TypeRef::List, |p, v| {
                    let list = v.as_list().ok_or_else(|| {
                        InvokeError::Failed(format!("expected List, got {}", v.type_name()))
                    })?;
                    p.tags = list
                        .iter()
                        .cloned()
                        .map(String::try_from)
                        .collect::<Result<_, _>>()?;
                    Ok(())
                })
                .getter("getScores", TypeRef::Array(ArrayKind::Int), |p| {
                    PojoValue::array(p.scores.clone())
                })
                .setter("setScores", TypeRef::Array(ArrayKind::Int), |p, v| {
                    let scores = v
                        .as_array()
                        .and_then(|array| array.elements::<i32>())
                        .ok_or_else(|| {
                            InvokeError::Failed(format!("expected int[], got {}", v.type_name()))
                        })?;
                    p.scores = scores.to_vec();
                    Ok(())
                })
                .getter("toString", TypeRef::String, |p| format!("Person({})", p.name).into())
                .build()
        });
        &CLASS
    }
}

/// Immutable value type: its `setX`/`setY` return a new point.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Pojo for Point {
    fn pojo_class() -> &'static PojoClass {
        static CLASS: LazyLock<PojoClass> = LazyLock::new(|| {
            PojoClass::builder::<Point>("Point")
                .getter("getX", TypeRef::Int, |p| p.x.into())
                .wither("setX", TypeRef::Int, |p, v| {
                    Ok(Point {
                        x: i32::try_from(v)?,
                        ..p.clone()
                    })
                })
                .getter("getY", TypeRef::Int, |p| p.y.into())
                .wither("setY", TypeRef::Int, |p, v| {
                    Ok(Point {
                        y: i32::try_from(v)?,
                        ..p.clone()
                    })
                })
                .build()
        });
        &CLASS
    }
}

/// Mutable holder of two points.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Pojo for Line {
    fn pojo_class() -> &'static PojoClass {
        static CLASS: LazyLock<PojoClass> = LazyLock::new(|| {
            PojoClass::builder::<Line>("Line")
                .getter("getStart", TypeRef::Named("Point"), |l| {
                    PojoValue::object(l.start.clone())
                })
                .setter("setStart", TypeRef::Named("Point"), |l, v| {
                    l.start = v.to_pojo::<Point>()?;
                    Ok(())
                })
                .getter("getEnd", TypeRef::Named("Point"), |l| {
                    PojoValue::object(l.end.clone())
                })
                .setter("setEnd", TypeRef::Named("Point"), |l, v| {
                    l.end = v.to_pojo::<Point>()?;
                    Ok(())
                })
                .build()
        });
        &CLASS
    }
}

/// Record-style accessor plus a fluent setter declared as returning `Object`.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
}

impl Pojo for Label {
    fn pojo_class() -> &'static PojoClass {
        static CLASS: LazyLock<PojoClass> = LazyLock::new(|| {
            let set_text = MethodBody::exclusive(|this, args| {
                let label = this.downcast_mut::<Label>().ok_or(InvokeError::Receiver {
                    method: "setText",
                    expected: "Label",
                })?;
                let [text] = args else {
                    return Err(InvokeError::Arity {
                        method: "setText",
                        expected: 1,
                        actual: args.len(),
                    });
                };
                label.text = String::try_from(text.clone())?;
                Ok(PojoValue::object(label.clone()))
            });

            PojoClass::builder::<Label>("Label")
                .getter("text", TypeRef::String, |l| l.text.as_str().into())
                .getter("hashCode", TypeRef::Int, |_| PojoValue::Int(17))
                .method(PojoMethod::new(
                    "setText",
                    vec![TypeRef::String],
                    TypeRef::Object,
                    set_text,
                ))
                .build()
        });
        &CLASS
    }
}
