use aurora_connector::helpers::field_to_value;
use aurora_connector::{ResultSet, Value};
use aws_sdk_rdsdata::operation::execute_statement::ExecuteStatementOutput;
use aws_sdk_rdsdata::primitives::Blob;
use aws_sdk_rdsdata::types::{ArrayValue, ColumnMetadata, Field};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

fn column(name: &str, type_name: &str) -> ColumnMetadata {
    ColumnMetadata::builder()
        .name(name)
        .type_name(type_name)
        .nullable(1)
        .build()
}

fn sample_output() -> ExecuteStatementOutput {
    ExecuteStatementOutput::builder()
        .column_metadata(column("id", "int8"))
        .column_metadata(column("created_at", "timestamp"))
        .column_metadata(column("birthday", "date"))
        .column_metadata(column("balance", "numeric"))
        .column_metadata(column("profile", "jsonb"))
        .column_metadata(column("avatar", "bytea"))
        .records(vec![
            Field::LongValue(1),
            Field::StringValue("2021-06-01 09:30:00.5".to_string()),
            Field::StringValue("1990-02-14".to_string()),
            Field::StringValue("10.50".to_string()),
            Field::StringValue(r#"{"plan":"pro"}"#.to_string()),
            Field::BlobValue(Blob::new(b"png".to_vec())),
        ])
        .records(vec![
            Field::LongValue(2),
            Field::IsNull(true),
            Field::IsNull(true),
            Field::StringValue("0".to_string()),
            Field::IsNull(true),
            Field::IsNull(true),
        ])
        .number_of_records_updated(0)
        .build()
}

#[test]
fn test_result_set_converts_by_column_type() {
    let result = ResultSet::from_output(&sample_output()).unwrap();

    assert_eq!(result.columns.len(), 6);
    assert_eq!(result.rows.len(), 2);

    let first = &result.rows[0];
    assert_eq!(first.get::<i64>("id").unwrap(), 1);
    assert_eq!(
        first.get::<NaiveDateTime>("created_at").unwrap(),
        NaiveDate::from_ymd_opt(2021, 6, 1)
            .unwrap()
            .and_hms_milli_opt(9, 30, 0, 500)
            .unwrap()
    );
    assert_eq!(
        first.get::<NaiveDate>("birthday").unwrap(),
        NaiveDate::from_ymd_opt(1990, 2, 14).unwrap()
    );
    assert_eq!(
        first.value("balance"),
        Some(&Value::Decimal("10.50".to_string()))
    );
    assert_eq!(
        first.get::<serde_json::Value>("profile").unwrap(),
        json!({"plan": "pro"})
    );
    assert_eq!(first.get::<Vec<u8>>("avatar").unwrap(), b"png");
}

#[test]
fn test_nulls_extract_as_none() {
    let result = ResultSet::from_output(&sample_output()).unwrap();
    let second = &result.rows[1];

    assert_eq!(second.get::<Option<NaiveDate>>("birthday").unwrap(), None);
    assert!(second.get::<NaiveDate>("birthday").is_err());
}

#[test]
fn test_row_to_json_uses_column_names() {
    let result = ResultSet::from_output(&sample_output()).unwrap();

    assert_eq!(
        result.rows[0].to_json(),
        json!({
            "id": 1,
            "created_at": "2021-06-01T09:30:00.500",
            "birthday": "1990-02-14",
            "balance": "10.50",
            "profile": {"plan": "pro"},
            "avatar": "cG5n",
        })
    );
}

#[test]
fn test_missing_column_lookup_is_an_error() {
    let result = ResultSet::from_output(&sample_output()).unwrap();
    let err = result.rows[0].get::<i64>("nope").unwrap_err();
    assert!(err.to_string().contains("no column named"));
}

#[test]
fn test_malformed_timestamp_is_rejected() {
    let output = ExecuteStatementOutput::builder()
        .column_metadata(column("at", "timestamptz"))
        .records(vec![Field::StringValue("yesterday".to_string())])
        .build();

    let err = ResultSet::from_output(&output).unwrap_err();
    assert!(err.to_string().contains("invalid timestamp"));
}

#[test]
fn test_records_without_metadata_get_positional_names() {
    let output = ExecuteStatementOutput::builder()
        .records(vec![Field::LongValue(5), Field::StringValue("x".to_string())])
        .build();

    let result = ResultSet::from_output(&output).unwrap();
    let row = &result.rows[0];
    assert_eq!(row.get::<i64>("0").unwrap(), 5);
    assert_eq!(row.get::<String>("1").unwrap(), "x");
}

#[test]
fn test_generated_fields_and_update_count() {
    let output = ExecuteStatementOutput::builder()
        .number_of_records_updated(1)
        .generated_fields(Field::LongValue(42))
        .build();

    let result = ResultSet::from_output(&output).unwrap();
    assert!(result.rows.is_empty());
    assert_eq!(result.records_updated, 1);
    assert_eq!(result.generated_fields, vec![Value::Long(42)]);
}

#[test]
fn test_array_fields_become_arrays() {
    let field = Field::ArrayValue(ArrayValue::LongValues(vec![Some(1), None, Some(3)]));
    assert_eq!(
        field_to_value(&field, Some("_int8")).unwrap(),
        Value::Array(vec![Value::Long(1), Value::Null, Value::Long(3)])
    );
}

#[test]
fn test_nested_arrays_keep_null_rows() {
    let field = Field::ArrayValue(ArrayValue::ArrayValues(vec![
        Some(ArrayValue::StringValues(vec![Some("a".to_string()), None])),
        None,
    ]));
    assert_eq!(
        field_to_value(&field, Some("_text")).unwrap(),
        Value::Array(vec![
            Value::Array(vec![Value::String("a".to_string()), Value::Null]),
            Value::Null,
        ])
    );
}

#[test]
fn test_time_outside_a_day_stays_text() {
    let output = ExecuteStatementOutput::builder()
        .column_metadata(column("opens", "time"))
        .records(vec![Field::StringValue("09:15:00".to_string())])
        .records(vec![Field::StringValue("24:00:00".to_string())])
        .records(vec![Field::StringValue("100:00:00".to_string())])
        .records(vec![Field::StringValue("-01:30:00".to_string())])
        .build();

    let result = ResultSet::from_output(&output).unwrap();
    let values: Vec<&Value> = result
        .rows
        .iter()
        .map(|row| row.value("opens").unwrap())
        .collect();

    assert_eq!(
        values[0],
        &Value::Time(chrono::NaiveTime::from_hms_opt(9, 15, 0).unwrap())
    );
    assert_eq!(values[1], &Value::String("24:00:00".to_string()));
    assert_eq!(values[2], &Value::String("100:00:00".to_string()));
    assert_eq!(values[3], &Value::String("-01:30:00".to_string()));
}

#[test]
fn test_duplicate_column_names_first_wins() {
    let output = ExecuteStatementOutput::builder()
        .column_metadata(column("id", "int8"))
        .column_metadata(column("id", "int8"))
        .records(vec![Field::LongValue(1), Field::LongValue(2)])
        .build();

    let result = ResultSet::from_output(&output).unwrap();
    let row = &result.rows[0];

    assert_eq!(row.get::<i64>("id").unwrap(), 1);
    assert_eq!(row.get_at::<i64>(1).unwrap(), 2);
    assert_eq!(row.to_json(), json!({"id": 1}));
}

#[test]
fn test_uuid_column_is_parsed() {
    let field = Field::StringValue("6f1c2f3e-8d4b-4c2a-9e57-0b1f4a7d9c10".to_string());
    let value = field_to_value(&field, Some("uuid")).unwrap();
    assert!(matches!(value, Value::Uuid(_)));

    let bad = Field::StringValue("not-a-uuid".to_string());
    assert!(field_to_value(&bad, Some("uuid")).is_err());
}
