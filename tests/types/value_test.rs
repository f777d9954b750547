use tumpuk::types::{
    error::DatabaseError,
    value::{DataType, Value},
};

#[test]
fn test_value_data_type() {
    assert_eq!(Value::Integer(1).data_type(), DataType::Int);
    assert_eq!(Value::Text("x".to_string()).data_type(), DataType::Text);
    assert_eq!(Value::Double(1.5).data_type(), DataType::Double);
}

#[test]
fn test_value_conversions() {
    assert_eq!(Value::from(12), Value::Integer(12));
    assert_eq!(Value::from("Hello!"), Value::Text("Hello!".to_string()));
    assert_eq!(Value::from(String::from("s")), Value::Text("s".to_string()));
    assert_eq!(Value::Integer(-3).as_integer(), Some(-3));
    assert_eq!(Value::Integer(-3).as_text(), None);
    assert_eq!(Value::from("t").as_text(), Some("t"));
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Integer(42).to_string(), "42");
    assert_eq!(Value::from("hi").to_string(), "\"hi\"");
}

#[test]
fn test_data_type_from_string() {
    assert_eq!(DataType::from_string("int").unwrap(), DataType::Int);
    assert_eq!(DataType::from_string("INTEGER").unwrap(), DataType::Int);
    assert_eq!(DataType::from_string("Text").unwrap(), DataType::Text);
    assert_eq!(DataType::from_string("DOUBLE").unwrap(), DataType::Double);
    assert!(matches!(
        DataType::from_string("BLOB"),
        Err(DatabaseError::UnsupportedType { .. })
    ));
    assert_eq!(DataType::Text.to_string(), "TEXT");
}
