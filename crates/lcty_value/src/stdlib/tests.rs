use super::*;
use crate::errors::ErrorKind;

#[test]
fn test_upper_and_lower() {
    assert_eq!(
        upper().call(&[Value::string("hello")]).unwrap(),
        Value::string("HELLO")
    );
    assert_eq!(
        lower().call(&[Value::string("HeLLo")]).unwrap(),
        Value::string("hello")
    );
}

#[test]
fn test_strlen_counts_characters() {
    assert_eq!(
        strlen().call(&[Value::string("日本")]).unwrap(),
        Value::int(2)
    );
}

#[test]
fn test_abs() {
    assert_eq!(abs().call(&[Value::int(-3)]).unwrap(), Value::int(3));
}

#[test]
fn test_bodies_reject_missing_arguments() {
    let err = string_length(&[]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeRequired { expected: Type::String });
    let err = absolute(&[]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeRequired { expected: Type::Number });
}

#[test]
fn test_max_and_min() {
    let args = [Value::int(1), Value::int(2), Value::int(10), Value::int(6)];
    assert_eq!(max().call(&args).unwrap(), Value::int(10));
    assert_eq!(min().call(&args).unwrap(), Value::int(1));
}

#[test]
fn test_max_converts_numeral_strings() {
    let args = [Value::string("4"), Value::int(3)];
    assert_eq!(max().call(&args).unwrap(), Value::int(4));
}

#[test]
fn test_max_requires_an_argument() {
    let err = max().call(&[]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotEnoughArguments { expected: 1, got: 0 });
}
