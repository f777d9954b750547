use tumpuk::{
    storage::schema::{ColumnAttribute, ColumnSchema, TableSchema},
    types::{
        error::DatabaseError,
        row::Row,
        value::{DataType, Value},
    },
};

fn int_text_columns() -> Vec<ColumnSchema> {
    TableSchema::new(
        "t",
        vec!["a", "b"],
        vec![
            ColumnAttribute::new(DataType::Int),
            ColumnAttribute::new(DataType::Text),
        ],
    )
    .unwrap()
    .columns
}

#[test]
fn test_row_builder_and_lookup() {
    let row = Row::new().with("a", 12).with("b", "Hello!");

    assert_eq!(row.len(), 2);
    assert!(!row.is_empty());
    assert_eq!(row.get("a"), Some(&Value::Integer(12)));
    assert_eq!(row.get("b"), Some(&Value::Text("Hello!".to_string())));
    assert_eq!(row.get("c"), None);
    assert!(row.contains_column("a"));
    assert_eq!(row.column_names(), vec!["a", "b"]);
}

#[test]
fn test_row_insert_replaces() {
    let mut row = Row::new().with("a", 1);
    let previous = row.insert("a", 2);

    assert_eq!(previous, Some(Value::Integer(1)));
    assert_eq!(row.len(), 1);
    assert_eq!(row.get("a"), Some(&Value::Integer(2)));
}

#[test]
fn test_row_equality_ignores_column_order() {
    let left = Row::new().with("a", 1).with("b", "x");
    let right = Row::new().with("b", "x").with("a", 1);
    let different = Row::new().with("a", 1).with("b", "y");
    let shorter = Row::new().with("a", 1);

    assert_eq!(left, right);
    assert_ne!(left, different);
    assert_ne!(left, shorter);
    assert_ne!(shorter, left);
}

#[test]
fn test_row_display() {
    let row = Row::new().with("a", 12).with("b", "Hello!");
    assert_eq!(row.to_string(), "{a: 12, b: \"Hello!\"}");
}

#[test]
fn test_marshal_layout() {
    let row = Row::new().with("a", 12).with("b", "Hello!");

    let bytes = row.to_bytes(&int_text_columns()).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&12i32.to_ne_bytes());
    expected.extend_from_slice(&6u16.to_ne_bytes());
    expected.extend_from_slice(b"Hello!");
    assert_eq!(bytes, expected);
}

#[test]
fn test_marshal_follows_declared_order() {
    let row = Row::new().with("b", "z").with("a", -1);

    let bytes = row.to_bytes(&int_text_columns()).unwrap();

    assert_eq!(&bytes[0..4], &(-1i32).to_ne_bytes());
    assert_eq!(bytes.len(), 4 + 2 + 1);
}

#[test]
fn test_round_trip() {
    let columns = int_text_columns();
    let rows = vec![
        Row::new().with("a", 0).with("b", ""),
        Row::new().with("a", i32::MIN).with("b", "Hello!"),
        Row::new().with("a", i32::MAX).with("b", "x".repeat(1000)),
    ];

    for row in rows {
        let bytes = row.to_bytes(&columns).unwrap();
        let decoded = Row::from_bytes(&bytes, &columns).unwrap();
        assert_eq!(decoded, row);
        assert_eq!(decoded.column_names(), vec!["a", "b"]);
    }
}

#[test]
fn test_marshal_missing_column() {
    let row = Row::new().with("a", 1);

    match row.to_bytes(&int_text_columns()) {
        Err(DatabaseError::MissingColumn { name }) => assert_eq!(name, "b"),
        other => panic!("Expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_marshal_type_mismatch() {
    let row = Row::new().with("a", "not a number").with("b", "x");

    match row.to_bytes(&int_text_columns()) {
        Err(DatabaseError::TypeMismatch { column, expected, actual }) => {
            assert_eq!(column, "a");
            assert_eq!(expected, "INT");
            assert_eq!(actual, "TEXT");
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_double_column_unsupported() {
    let columns = vec![ColumnSchema::new("d".to_string(), DataType::Double, 0)];
    let row = Row::new().with("d", 1.5);

    assert!(matches!(
        row.to_bytes(&columns),
        Err(DatabaseError::UnsupportedType { .. })
    ));
    assert!(matches!(
        Row::from_bytes(&[0u8; 8], &columns),
        Err(DatabaseError::UnsupportedType { .. })
    ));
}

#[test]
fn test_text_too_long() {
    let row = Row::new().with("a", 1).with("b", "x".repeat(u16::MAX as usize + 1));

    assert!(matches!(
        row.to_bytes(&int_text_columns()),
        Err(DatabaseError::ValueTooLarge { .. })
    ));
}

#[test]
fn test_unmarshal_truncated() {
    let columns = int_text_columns();
    let bytes = Row::new()
        .with("a", 5)
        .with("b", "truncated")
        .to_bytes(&columns)
        .unwrap();

    for cut in [0, 3, 5, bytes.len() - 1] {
        assert!(matches!(
            Row::from_bytes(&bytes[..cut], &columns),
            Err(DatabaseError::SerializationError { .. })
        ));
    }
}
