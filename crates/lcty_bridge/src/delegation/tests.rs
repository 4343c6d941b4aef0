use std::rc::Rc;

use super::*;
use lcty_host::Runtime;
use pretty_assertions::assert_eq;

struct Fixture {
    rt: Runtime,
    c: Converter,
}

impl Fixture {
    fn new() -> Self {
        let rt = Runtime::new();
        let c = Converter::new(&rt);
        Fixture { rt, c }
    }

    fn wrap(&self, v: Value) -> DynValue {
        self.c.wrap(v)
    }

    fn unwrap(&self, v: &DynValue) -> Value {
        self.c.unwrap(v).unwrap()
    }

    fn arith(&self, op: lcty_host::ArithOp, a: &DynValue, b: &DynValue) -> Value {
        self.unwrap(&self.rt.arith(op, a, b).unwrap())
    }

    /// Invoke one handler directly, bypassing the runtime's fast paths.
    fn handler(&self, event: MetaEvent, args: Vec<DynValue>) -> DynValue {
        let handler = self.c.metatable().get(event).unwrap().clone();
        let results = self.rt.call(&DynValue::Function(handler), args).unwrap();
        results.into_iter().next().unwrap()
    }
}

// Equality

#[test]
fn test_wrapped_values_compare_structurally() {
    let f = Fixture::new();
    let a = f.wrap(Value::string("x"));
    let b = f.wrap(Value::string("x"));
    let c = f.wrap(Value::string("y"));
    assert!(f.rt.equals(&a, &b).unwrap());
    assert!(!f.rt.equals(&a, &c).unwrap());
}

#[test]
fn test_wrapped_never_equals_native() {
    let f = Fixture::new();
    let a = f.wrap(Value::string("x"));
    assert!(!f.rt.equals(&a, &"x".into()).unwrap());
    // Even when the handler sees the native operand itself.
    let r = f.handler(MetaEvent::Eq, vec![a, "x".into()]);
    assert_eq!(r.as_bool(), Some(false));
}

#[test]
fn test_foreign_userdata_is_never_equal() {
    let f = Fixture::new();
    let a = f.wrap(Value::int(1));
    let foreign = f.rt.new_userdata(1_i32, None);
    assert!(!f.rt.equals(&a, &foreign).unwrap());
}

#[test]
fn test_unknown_equality_is_false() {
    let f = Fixture::new();
    let a = f.wrap(Value::unknown(Type::String));
    let b = f.wrap(Value::string("x"));
    assert!(!f.rt.equals(&a, &b).unwrap());
}

// Arithmetic

#[test]
fn test_arithmetic_mixed_operands() {
    use lcty_host::ArithOp as Op;
    let f = Fixture::new();
    let two = f.wrap(Value::int(2));
    assert_eq!(f.arith(Op::Add, &two, &"3".into()), Value::int(5));
    assert_eq!(f.arith(Op::Add, &3.into(), &two), Value::int(5));
    assert_eq!(
        f.arith(Op::Div, &f.wrap(Value::int(6)), &two),
        Value::int(3)
    );
    assert_eq!(
        f.arith(Op::Mod, &f.wrap(Value::int(7)), &two),
        Value::int(1)
    );
    assert_eq!(
        f.arith(Op::Sub, &two, &f.wrap(Value::int(5))),
        Value::int(-3)
    );
    assert_eq!(f.arith(Op::Mul, &two, &2.5.into()), Value::int(5));
}

#[test]
fn test_arithmetic_is_exact() {
    use lcty_host::ArithOp as Op;
    let f = Fixture::new();
    let a = f.wrap(Value::number_from_f64(0.1).unwrap());
    let r = f.arith(Op::Add, &a, &0.2.into());
    assert_eq!(r.to_string(), "0.3");
}

#[test]
fn test_arithmetic_at_extreme_magnitudes() {
    use lcty_host::ArithOp as Op;
    let f = Fixture::new();
    let big = f.wrap(Value::number_from_f64(1e16).unwrap());
    let product = f.arith(Op::Mul, &big, &1e16.into());
    assert_eq!(product, Value::number("1e32".parse().unwrap()));

    let huge = f.wrap(Value::number_from_f64(1e30).unwrap());
    let sum = f.arith(Op::Add, &huge, &1.into());
    assert_eq!(sum.to_string(), "1000000000000000000000000000001");

    let tiny = f.wrap(Value::number_from_f64(1e-30).unwrap());
    let square = f.arith(Op::Mul, &tiny, &1e-30.into());
    assert_ne!(square, Value::int(0));
    assert_eq!(square, Value::number("1e-60".parse().unwrap()));
}

#[test]
fn test_negate() {
    let f = Fixture::new();
    let r = f.rt.negate(&f.wrap(Value::int(7))).unwrap();
    assert_eq!(f.unwrap(&r), Value::int(-7));
}

#[test]
fn test_arithmetic_errors_are_raised() {
    use lcty_host::ArithOp as Op;
    let f = Fixture::new();
    let one = f.wrap(Value::int(1));

    let err = f.rt.arith(Op::Div, &one, &0.into()).unwrap_err();
    assert_eq!(err.message(), "division by zero");

    let err = f.rt.arith(Op::Add, &one, &"one".into()).unwrap_err();
    assert_eq!(err.message(), "a number is required");

    let table = f.rt.new_table();
    let err = f.rt.arith(Op::Add, &one, &table.into()).unwrap_err();
    assert_eq!(err.message(), "a number is required");
}

// Concatenation and length

#[test]
fn test_concat() {
    let f = Fixture::new();
    let a = f.wrap(Value::string("foo"));
    let r = f.rt.concat(&a, &"bar".into()).unwrap();
    assert_eq!(f.unwrap(&r), Value::string("foobar"));
    let r = f.rt.concat(&f.wrap(Value::int(1)), &"x".into()).unwrap();
    assert_eq!(f.unwrap(&r), Value::string("1x"));
}

#[test]
fn test_concat_rejects_collections() {
    let f = Fixture::new();
    let list = f.wrap(Value::list(Type::Number, vec![]));
    let err = f.rt.concat(&list, &"x".into()).unwrap_err();
    assert_eq!(err.message(), "a string is required");
}

#[test]
fn test_length() {
    let f = Fixture::new();
    let len = |v: Value| f.unwrap(&f.rt.len(&f.wrap(v)).unwrap());
    assert_eq!(len(Value::empty_tuple()), Value::int(0));
    assert_eq!(
        len(Value::list(Type::Number, vec![Value::int(1), Value::int(2)])),
        Value::int(2)
    );
    assert_eq!(len(Value::string("héllo")), Value::int(5));
}

#[test]
fn test_string_length_conventions_differ() {
    let f = Fixture::new();
    // The host counts bytes of plain strings.
    let native = f.rt.len(&"héllo".into()).unwrap();
    assert_eq!(native.as_number(), Some(6.0));
}

#[test]
fn test_length_of_scalar_is_raised() {
    let f = Fixture::new();
    let err = f.rt.len(&f.wrap(Value::Bool(true))).unwrap_err();
    assert_eq!(err.message(), "cannot get the length of a bool value");
}

// Indexing

#[test]
fn test_index_object_and_map() {
    let f = Fixture::new();
    let obj = f.wrap(Value::object([
        ("name", Value::string("web")),
        ("port", Value::null(Type::Number)),
    ]));
    let name = f.rt.index(&obj, &"name".into()).unwrap();
    assert_eq!(f.unwrap(&name), Value::string("web"));
    assert!(f.rt.index(&obj, &"missing".into()).unwrap().is_nil());
    assert!(f.rt.index(&obj, &"port".into()).unwrap().is_nil());

    let map = f.wrap(Value::map(
        Type::Number,
        [("1".to_string(), Value::int(10))].into_iter().collect(),
    ));
    let hit = f.rt.index(&map, &1.into()).unwrap();
    assert_eq!(f.unwrap(&hit), Value::int(10));
}

#[test]
fn test_index_sequences_from_zero() {
    let f = Fixture::new();
    let list = f.wrap(Value::list(
        Type::String,
        vec![Value::string("a"), Value::string("b")],
    ));
    let first = f.rt.index(&list, &0.into()).unwrap();
    assert_eq!(f.unwrap(&first), Value::string("a"));
    let by_wrapped = f.rt.index(&list, &f.wrap(Value::int(1))).unwrap();
    assert_eq!(f.unwrap(&by_wrapped), Value::string("b"));

    for key in [DynValue::from(2), (-1).into(), 0.5.into(), "x".into()] {
        assert!(f.rt.index(&list, &key).unwrap().is_nil());
    }
}

#[test]
fn test_index_never_raises() {
    let f = Fixture::new();
    let n = f.wrap(Value::int(1));
    assert!(f.rt.index(&n, &"x".into()).unwrap().is_nil());
    let obj = f.wrap(Value::empty_object());
    let table = f.rt.new_table();
    assert!(f.rt.index(&obj, &table.into()).unwrap().is_nil());
}

// Ordering

#[test]
fn test_ordering_numbers() {
    let f = Fixture::new();
    let one = f.wrap(Value::int(1));
    let two = f.wrap(Value::int(2));
    assert!(f.rt.less_than(&one, &two).unwrap());
    assert!(!f.rt.less_than(&two, &one).unwrap());
    assert!(f.rt.less_equal(&two, &"2".into()).unwrap());
    assert!(f.rt.greater_than(&two, &1.into()).unwrap());
    assert!(f.rt.greater_equal(&"3".into(), &two).unwrap());
}

#[test]
fn test_ordering_strings() {
    let f = Fixture::new();
    let apple = f.wrap(Value::string("apple"));
    assert!(f.rt.less_than(&apple, &"banana".into()).unwrap());
    // "10" < "9" as text.
    let ten = f.wrap(Value::string("10"));
    assert!(f.rt.less_than(&ten, &"9".into()).unwrap());
}

#[test]
fn test_ordering_returns_native_bool() {
    let f = Fixture::new();
    let r = f.handler(
        MetaEvent::Lt,
        vec![f.wrap(Value::int(1)), f.wrap(Value::int(2))],
    );
    assert_eq!(r.as_bool(), Some(true));
}

#[test]
fn test_ordering_incomparable_is_raised() {
    let f = Fixture::new();
    let word = f.wrap(Value::string("x"));
    let err = f.rt.less_than(&word, &1.into()).unwrap_err();
    assert_eq!(err.message(), "a number is required");
}

// tostring

#[test]
fn test_tostring() {
    let f = Fixture::new();
    assert_eq!(f.rt.tostring(&f.wrap(Value::string("hi"))).unwrap(), "hi");
    assert_eq!(f.rt.tostring(&f.wrap(Value::int(42))).unwrap(), "42");
    let list = Value::list(Type::Number, vec![Value::int(1), Value::int(2)]);
    assert_eq!(f.rt.tostring(&f.wrap(list)).unwrap(), "[1, 2]");
    assert_eq!(
        f.rt.tostring(&f.wrap(Value::null(Type::String))).unwrap(),
        "null"
    );
}

#[test]
fn test_handlers_share_one_table() {
    let f = Fixture::new();
    let built = Rc::clone(f.c.metatable());
    assert_eq!(built.len(), HANDLERS.len());
}

#[test]
fn test_integral() {
    let n = |text: &str| text.parse::<BigDecimal>().unwrap();
    assert_eq!(integral(&n("3")), Some(3));
    assert_eq!(integral(&n("3.0")), Some(3));
    assert_eq!(integral(&n("3.5")), None);
    assert_eq!(integral(&n("1e3")), Some(1000));
    assert_eq!(integral(&n("1e30")), None);
}
