use super::*;
use crate::errors::ErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn test_identity() {
    let v = Value::object([("a", Value::int(1))]);
    assert_eq!(convert(&v, &v.ty()).unwrap(), v);
}

#[test]
fn test_dynamic_target_is_identity() {
    let v = Value::string("x");
    assert_eq!(convert(&v, &Type::Dynamic).unwrap(), v);
}

#[test]
fn test_null_and_unknown_retarget() {
    assert_eq!(
        convert(&Value::null(Type::Dynamic), &Type::String).unwrap(),
        Value::null(Type::String)
    );
    assert_eq!(
        convert(&Value::unknown(Type::Number), &Type::String).unwrap(),
        Value::unknown(Type::String)
    );
}

#[test]
fn test_string_to_number() {
    assert_eq!(
        convert(&Value::string("12"), &Type::Number).unwrap(),
        Value::int(12)
    );
    assert_eq!(
        convert(&Value::string("1e3"), &Type::Number).unwrap(),
        Value::int(1000)
    );
    let err = convert(&Value::string("not a number"), &Type::Number).unwrap_err();
    assert_eq!(err.message, "a number is required");
}

#[test]
fn test_number_to_string_is_normalized() {
    assert_eq!(
        convert(&Value::int(12), &Type::String).unwrap(),
        Value::string("12")
    );
    let n = Value::number("12.50".parse::<BigDecimal>().unwrap());
    assert_eq!(convert(&n, &Type::String).unwrap(), Value::string("12.5"));
}

#[test]
fn test_number_to_string_at_extreme_magnitudes() {
    let huge = convert(&Value::string("1e30"), &Type::Number).unwrap();
    assert_eq!(
        convert(&huge, &Type::String).unwrap(),
        Value::string("1000000000000000000000000000000")
    );

    let tiny = convert(&Value::string("1e-30"), &Type::Number).unwrap();
    assert_ne!(tiny, Value::int(0));
    let text = convert(&tiny, &Type::String).unwrap();
    let back = convert(&text, &Type::Number).unwrap();
    assert_eq!(back, tiny);
}

#[test]
fn test_bool_string_round() {
    assert_eq!(
        convert(&Value::Bool(true), &Type::String).unwrap(),
        Value::string("true")
    );
    assert_eq!(
        convert(&Value::string("false"), &Type::Bool).unwrap(),
        Value::Bool(false)
    );
    assert!(convert(&Value::string("yes"), &Type::Bool).is_err());
    assert!(convert(&Value::int(1), &Type::Bool).is_err());
}

#[test]
fn test_object_to_string_fails() {
    let err = convert(&Value::empty_object(), &Type::String).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeRequired { expected: Type::String });
}

#[test]
fn test_tuple_to_list() {
    let t = Value::tuple(vec![Value::int(1), Value::int(2)]);
    assert_eq!(
        convert(&t, &Type::list(Type::Number)).unwrap(),
        Value::list(Type::Number, vec![Value::int(1), Value::int(2)])
    );
}

#[test]
fn test_tuple_to_list_of_dynamic_unifies() {
    let t = Value::tuple(vec![Value::string("a"), Value::int(2)]);
    assert_eq!(
        convert(&t, &Type::list(Type::Dynamic)).unwrap(),
        Value::list(Type::String, vec![Value::string("a"), Value::string("2")])
    );
}

#[test]
fn test_tuple_to_list_of_dynamic_inconsistent() {
    let t = Value::tuple(vec![Value::int(1), Value::empty_object()]);
    let err = convert(&t, &Type::list(Type::Dynamic)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InconsistentElementTypes);
}

#[test]
fn test_list_to_set_deduplicates() {
    let l = Value::list(Type::Number, vec![Value::int(1), Value::int(1)]);
    let s = convert(&l, &Type::set(Type::Number)).unwrap();
    assert_eq!(s, Value::set(Type::Number, vec![Value::int(1)]));
}

#[test]
fn test_object_to_map() {
    let o = Value::object([("a", Value::int(1)), ("b", Value::string("2"))]);
    let m = convert(&o, &Type::map(Type::Number)).unwrap();
    assert_eq!(
        m,
        Value::map(
            Type::Number,
            [
                ("a".to_string(), Value::int(1)),
                ("b".to_string(), Value::int(2))
            ]
            .into()
        )
    );
}

#[test]
fn test_element_error_is_located() {
    let o = Value::object([("port", Value::string("eighty"))]);
    let err = convert(&o, &Type::map(Type::Number)).unwrap_err();
    assert_eq!(err.to_string(), "port: a number is required");
}

#[test]
fn test_map_to_object_requires_declared_attributes() {
    let m = Value::map(Type::String, [("a".to_string(), Value::string("x"))].into());
    let target = Type::object([("a", Type::String), ("b", Type::String)]);
    let err = convert(&m, &target).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AttributeRequired { name: "b".into() });
}

#[test]
fn test_object_to_object_drops_extra_attributes() {
    let o = Value::object([("a", Value::int(1)), ("extra", Value::Bool(true))]);
    let target = Type::object([("a", Type::String)]);
    assert_eq!(
        convert(&o, &target).unwrap(),
        Value::object([("a", Value::string("1"))])
    );
}

#[test]
fn test_list_to_tuple_length_mismatch() {
    let l = Value::list(Type::Number, vec![Value::int(1)]);
    let err = convert(&l, &Type::tuple(vec![Type::Number, Type::Number])).unwrap_err();
    assert_eq!(err.kind, ErrorKind::WrongLength { expected: 2, got: 1 });
}

#[test]
fn test_unify() {
    assert_eq!(unify(&[Type::Number, Type::Number]).unwrap(), Type::Number);
    assert_eq!(unify(&[Type::Dynamic, Type::Bool]).unwrap(), Type::Bool);
    assert_eq!(unify(std::iter::empty::<&Type>()).unwrap(), Type::Dynamic);
    assert_eq!(unify(&[Type::Bool, Type::Number]).unwrap(), Type::String);
    assert!(unify(&[Type::Number, Type::list(Type::Number)]).is_err());
}
