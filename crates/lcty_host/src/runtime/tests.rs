use std::rc::Rc;

use super::*;
use crate::error::{runtime_error, HostErrorKind};
use pretty_assertions::assert_eq;

fn num(v: &DynValue) -> f64 {
    v.as_number().unwrap()
}

/// Userdata holding an `i32` whose `Add` handler adds payloads.
fn counter_metatable() -> Rc<Metatable> {
    let add = Callable::new("__add", |rt, args| {
        let a = args.check_any(0)?;
        let b = args.check_any(1)?;
        let x = a.as_userdata().and_then(|u| u.payload::<i32>()).copied();
        let y = b.as_userdata().and_then(|u| u.payload::<i32>()).copied();
        match (x, y) {
            (Some(x), Some(y)) => Ok(vec![rt.new_userdata(x + y, None)]),
            _ => Err(runtime_error("counters only add to counters")),
        }
    });
    let eq = Callable::new("__eq", |_, args| {
        let x = args.get(0).as_userdata().and_then(|u| u.payload::<i32>()).copied();
        let y = args.get(1).as_userdata().and_then(|u| u.payload::<i32>()).copied();
        Ok(vec![DynValue::Bool(x.is_some() && x == y)])
    });
    Rc::new(
        Metatable::new()
            .with(MetaEvent::Add, add)
            .with(MetaEvent::Eq, eq),
    )
}

#[test]
fn test_arith_native_and_coerced() {
    let rt = Runtime::new();
    let r = rt.arith(ArithOp::Add, &2.into(), &"3".into()).unwrap();
    assert_eq!(num(&r), 5.0);
    let r = rt.arith(ArithOp::Div, &7.into(), &2.into()).unwrap();
    assert_eq!(num(&r), 3.5);
}

#[test]
fn test_floored_modulo() {
    let rt = Runtime::new();
    let r = rt.arith(ArithOp::Mod, &(-7).into(), &3.into()).unwrap();
    assert_eq!(num(&r), 2.0);
}

#[test]
fn test_arith_error_names_kind() {
    let rt = Runtime::new();
    let err = rt
        .arith(ArithOp::Add, &1.into(), &DynValue::Table(Table::new()))
        .unwrap_err();
    assert_eq!(err.to_string(), "attempt to perform arithmetic on a table value");
    let err = rt.arith(ArithOp::Add, &"x".into(), &1.into()).unwrap_err();
    assert_eq!(err.to_string(), "attempt to perform arithmetic on a string value");
}

#[test]
fn test_arith_delegates_to_either_operand() {
    let rt = Runtime::new();
    let mt = counter_metatable();
    let a = rt.new_userdata(2_i32, Some(mt.clone()));
    let b = rt.new_userdata(3_i32, None);
    let sum = rt.arith(ArithOp::Add, &b, &a).unwrap();
    assert_eq!(sum.as_userdata().and_then(|u| u.payload::<i32>()), Some(&5));
}

#[test]
fn test_handler_error_propagates() {
    let rt = Runtime::new();
    let a = rt.new_userdata(2_i32, Some(counter_metatable()));
    let err = rt.arith(ArithOp::Add, &a, &1.into()).unwrap_err();
    assert_eq!(err.to_string(), "counters only add to counters");
}

#[test]
fn test_equality() {
    let rt = Runtime::new();
    let mt = counter_metatable();
    let a = rt.new_userdata(4_i32, Some(mt.clone()));
    let b = rt.new_userdata(4_i32, Some(mt));
    assert!(rt.equals(&a, &b).unwrap());
    assert!(!rt.equals(&a, &4.into()).unwrap());
    assert!(rt.equals(&"x".into(), &"x".into()).unwrap());
    assert!(!rt.equals(&"1".into(), &1.into()).unwrap());
    let t = Table::new();
    assert!(rt.equals(&t.clone().into(), &t.into()).unwrap());
    assert!(!rt
        .equals(&Table::new().into(), &Table::new().into())
        .unwrap());
}

#[test]
fn test_concat() {
    let rt = Runtime::new();
    let r = rt.concat(&"n=".into(), &1.5.into()).unwrap();
    assert_eq!(r.as_str(), Some("n=1.5"));
    let err = rt.concat(&"x".into(), &true.into()).unwrap_err();
    assert_eq!(err.to_string(), "attempt to concatenate a boolean value");
}

#[test]
fn test_len_counts_bytes_and_array_part() {
    let rt = Runtime::new();
    assert_eq!(num(&rt.len(&"héllo".into()).unwrap()), 6.0);
    let t = Table::new();
    t.set(0, "a").unwrap();
    t.set(1, "b").unwrap();
    t.set("k", "v").unwrap();
    assert_eq!(num(&rt.len(&t.into()).unwrap()), 2.0);
    assert!(rt.len(&1.into()).is_err());
}

#[test]
fn test_index() {
    let rt = Runtime::new();
    let t = Table::new();
    t.set("k", 1).unwrap();
    let t = DynValue::Table(t);
    assert_eq!(num(&rt.index(&t, &"k".into()).unwrap()), 1.0);
    assert!(rt.index(&t, &"missing".into()).unwrap().is_nil());
    let err = rt.index(&DynValue::Nil, &"k".into()).unwrap_err();
    assert_eq!(err.to_string(), "attempt to index a nil value");
}

#[test]
fn test_ordering() {
    let rt = Runtime::new();
    assert!(rt.less_than(&1.into(), &2.into()).unwrap());
    assert!(rt.less_equal(&2.into(), &2.into()).unwrap());
    assert!(rt.greater_than(&"b".into(), &"a".into()).unwrap());
    assert!(rt.greater_equal(&3.into(), &2.into()).unwrap());
    let err = rt.less_than(&1.into(), &"2".into()).unwrap_err();
    assert_eq!(err.to_string(), "attempt to compare number with string");
    let err = rt.less_than(&true.into(), &false.into()).unwrap_err();
    assert_eq!(err.to_string(), "attempt to compare two boolean values");
}

#[test]
fn test_tostring() {
    let rt = Runtime::new();
    assert_eq!(rt.tostring(&DynValue::Nil).unwrap(), "nil");
    assert_eq!(rt.tostring(&12.into()).unwrap(), "12");
    assert_eq!(rt.tostring(&true.into()).unwrap(), "true");
    assert!(rt.tostring(&Table::new().into()).unwrap().starts_with("table: 0x"));

    let named = Rc::new(Metatable::new().with(
        MetaEvent::ToString,
        Callable::new("__tostring", |_, _| Ok(vec!["custom".into()])),
    ));
    let u = rt.new_userdata((), Some(named));
    assert_eq!(rt.tostring(&u).unwrap(), "custom");

    let broken = Rc::new(Metatable::new().with(
        MetaEvent::ToString,
        Callable::new("__tostring", |_, _| Ok(vec![1.into()])),
    ));
    let u = rt.new_userdata((), Some(broken));
    assert_eq!(rt.tostring(&u).unwrap_err().kind, HostErrorKind::ToStringNotString);
}

#[test]
fn test_call_and_arguments() {
    let rt = Runtime::new();
    let f = rt.new_function("twice", |rt, args| {
        let x = args.check_any(0)?;
        Ok(vec![rt.arith(ArithOp::Mul, x, &2.into())?])
    });
    let out = rt.call(&f, vec![21.into()]).unwrap();
    assert_eq!(num(&out[0]), 42.0);

    let err = rt.call(&f, vec![]).unwrap_err();
    assert_eq!(err.to_string(), "bad argument #1 to 'twice' (value expected)");

    let err = rt.call(&1.into(), vec![]).unwrap_err();
    assert_eq!(err.to_string(), "attempt to call a number value");
}

#[test]
fn test_call_depth_is_bounded() {
    let rt = Runtime::builder().max_call_depth(5).build();
    let table = Table::new();
    let recurse = rt.new_function("recurse", {
        let table = table.clone();
        move |rt, _| {
            let me = table.get(&"recurse".into());
            rt.call(&me, vec![])
        }
    });
    table.set("recurse", recurse.clone()).unwrap();
    let err = rt.call(&recurse, vec![]).unwrap_err();
    assert_eq!(err.kind, HostErrorKind::StackOverflow { max_depth: 5 });
    assert_eq!(rt.call_depth(), 0);
}
