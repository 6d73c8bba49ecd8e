// dqgate-core/src/domain/quality/table.rs

// Column access over Arrow record batches. Every conversion reports failures
// as values so that a check can turn them into a FAIL result.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use datafusion::arrow::array::{Array, ArrayRef, AsArray};
use datafusion::arrow::compute::{CastOptions, cast, cast_with_options};
use datafusion::arrow::datatypes::{
    DataType, Float64Type, Int64Type, TimeUnit, TimestampMicrosecondType,
};
use datafusion::arrow::error::ArrowError;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::arrow::util::display::array_value_to_string;
use serde_json::Value;

pub fn column<'a>(table: &'a RecordBatch, name: &str) -> Option<&'a ArrayRef> {
    table.column_by_name(name)
}

/// Numeric view of a column. Strict: a value that is not a number is an error.
pub fn to_f64(array: &ArrayRef) -> Result<Vec<Option<f64>>, ArrowError> {
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    let casted = cast_with_options(array, &DataType::Float64, &options)?;
    Ok(casted.as_primitive::<Float64Type>().iter().collect())
}

/// String view of a column (nulls stay `None`).
pub fn to_strings(array: &ArrayRef) -> Result<Vec<Option<String>>, ArrowError> {
    let casted = cast(array, &DataType::Utf8)?;
    Ok(casted
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// UTC instants of a timestamp, date or string column.
pub fn to_timestamps(array: &ArrayRef) -> Result<Vec<Option<DateTime<Utc>>>, String> {
    match array.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => to_strings(array)
            .map_err(|e| e.to_string())?
            .into_iter()
            .map(|v| v.as_deref().map(parse_timestamp).transpose())
            .collect(),
        _ => {
            let target = DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("+00:00")));
            let casted = cast(array, &target).map_err(|e| e.to_string())?;
            Ok(casted
                .as_primitive::<TimestampMicrosecondType>()
                .iter()
                .map(|v| v.and_then(DateTime::from_timestamp_micros))
                .collect())
        }
    }
}

/// Parse a timestamp string. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }
    Err(format!("Unable to parse '{}' as a timestamp", raw))
}

/// JSON value of one cell, used for diagnostic samples.
pub fn cell_value(array: &ArrayRef, row: usize) -> Value {
    if array.logical_nulls().is_some_and(|nulls| nulls.is_null(row)) {
        return Value::Null;
    }

    let data_type = array.data_type();
    if data_type == &DataType::Boolean {
        return Value::Bool(array.as_boolean().value(row));
    }

    let cell = array.slice(row, 1);
    if data_type.is_integer()
        && let Ok(c) = cast(&cell, &DataType::Int64)
    {
        return Value::from(c.as_primitive::<Int64Type>().value(0));
    }
    if data_type.is_floating()
        && let Ok(c) = cast(&cell, &DataType::Float64)
        && let Some(n) = serde_json::Number::from_f64(c.as_primitive::<Float64Type>().value(0))
    {
        return Value::Number(n);
    }

    array_value_to_string(array, row)
        .map(Value::String)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{
        BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
        TimestampMillisecondArray,
    };

    #[test]
    fn test_strict_numeric_cast_reports_bad_values() {
        let ok: ArrayRef = Arc::new(StringArray::from(vec![Some("1.5"), None]));
        assert_eq!(to_f64(&ok).unwrap(), vec![Some(1.5), None]);

        let bad: ArrayRef = Arc::new(StringArray::from(vec!["1.5", "abc"]));
        assert!(to_f64(&bad).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let a = parse_timestamp("2025-01-15T10:30:00Z").unwrap();
        let b = parse_timestamp("2025-01-15 10:30:00").unwrap();
        let c = parse_timestamp("2025-01-15T12:30:00+02:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(
            parse_timestamp("2025-01-15").unwrap().to_rfc3339(),
            "2025-01-15T00:00:00+00:00"
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_native_timestamp_and_date_columns() {
        let millis: ArrayRef = Arc::new(TimestampMillisecondArray::from(vec![
            Some(1_736_937_000_000),
            None,
        ]));
        let ts = to_timestamps(&millis).unwrap();
        assert_eq!(ts[0].unwrap().to_rfc3339(), "2025-01-15T10:30:00+00:00");
        assert!(ts[1].is_none());

        // 2025-01-15 is day 20103 since the epoch.
        let dates: ArrayRef = Arc::new(Date32Array::from(vec![20103]));
        let ts = to_timestamps(&dates).unwrap();
        assert_eq!(ts[0].unwrap().to_rfc3339(), "2025-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_cell_value_keeps_json_types() {
        let ints: ArrayRef = Arc::new(Int64Array::from(vec![Some(7), None]));
        assert_eq!(cell_value(&ints, 0), Value::from(7));
        assert_eq!(cell_value(&ints, 1), Value::Null);

        let floats: ArrayRef = Arc::new(Float64Array::from(vec![2.5]));
        assert_eq!(cell_value(&floats, 0), Value::from(2.5));

        let bools: ArrayRef = Arc::new(BooleanArray::from(vec![true]));
        assert_eq!(cell_value(&bools, 0), Value::Bool(true));

        let strings: ArrayRef = Arc::new(StringArray::from(vec!["CUST-000001"]));
        assert_eq!(cell_value(&strings, 0), Value::from("CUST-000001"));
    }
}
