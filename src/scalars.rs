//! Scalar types and their wire codecs.
//!
//! The five GraphQL built-ins are joined by `Date`, `DateTime` and `Time`,
//! exchanged as ISO 8601 strings.

use async_graphql::dynamic;
use async_graphql::{Number, Value as ConstValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::value::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    String,
    Int,
    Float,
    Boolean,
    Id,
    Date,
    DateTime,
    Time,
}

impl Scalar {
    pub fn name(self) -> &'static str {
        match self {
            Scalar::String => "String",
            Scalar::Int => "Int",
            Scalar::Float => "Float",
            Scalar::Boolean => "Boolean",
            Scalar::Id => "ID",
            Scalar::Date => "Date",
            Scalar::DateTime => "DateTime",
            Scalar::Time => "Time",
        }
    }

    /// Built-ins are known to every engine and never registered.
    pub fn is_builtin(self) -> bool {
        matches!(
            self,
            Scalar::String | Scalar::Int | Scalar::Float | Scalar::Boolean | Scalar::Id
        )
    }

    pub fn description(self) -> Option<&'static str> {
        match self {
            Scalar::Date => Some(
                "The `Date` scalar type represents a Date value as specified by \
                 [iso8601](https://en.wikipedia.org/wiki/ISO_8601).",
            ),
            Scalar::DateTime => Some(
                "The `DateTime` scalar type represents a DateTime value as specified by \
                 [iso8601](https://en.wikipedia.org/wiki/ISO_8601).",
            ),
            Scalar::Time => Some(
                "The `Time` scalar type represents a Time value as specified by \
                 [iso8601](https://en.wikipedia.org/wiki/ISO_8601).",
            ),
            _ => None,
        }
    }

    /// Output coercion of a resolved value.
    pub fn serialize(self, value: &Value) -> Result<ConstValue, String> {
        let out = match (self, value) {
            (Scalar::String, Value::String(s)) => Some(ConstValue::String(s.clone())),
            (Scalar::String, Value::Int(i)) => Some(ConstValue::String(i.to_string())),
            (Scalar::String, Value::Float(f)) => Some(ConstValue::String(f.to_string())),
            (Scalar::String, Value::Boolean(b)) => Some(ConstValue::String(b.to_string())),

            (Scalar::Int, Value::Int(i)) => {
                let i = i32::try_from(*i).map_err(|_| {
                    format!("Int cannot represent non 32-bit signed integer value: {}", i)
                })?;
                Some(ConstValue::Number(Number::from(i)))
            }
            (Scalar::Int, Value::Float(f)) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => {
                Some(ConstValue::Number(Number::from(*f as i32)))
            }

            (Scalar::Float, Value::Float(f)) => Number::from_f64(*f).map(ConstValue::Number),
            (Scalar::Float, Value::Int(i)) => Number::from_f64(*i as f64).map(ConstValue::Number),

            (Scalar::Boolean, Value::Boolean(b)) => Some(ConstValue::Boolean(*b)),

            (Scalar::Id, Value::String(s)) => Some(ConstValue::String(s.clone())),
            (Scalar::Id, Value::Int(i)) => Some(ConstValue::String(i.to_string())),

            (Scalar::Date, Value::Date(d)) => Some(ConstValue::String(d.format(DATE_FORMAT).to_string())),
            (Scalar::Date, Value::DateTime(dt)) => Some(ConstValue::String(
                dt.date_naive().format(DATE_FORMAT).to_string(),
            )),

            (Scalar::DateTime, Value::DateTime(dt)) => Some(ConstValue::String(dt.to_rfc3339())),
            (Scalar::DateTime, Value::Date(d)) => {
                Some(ConstValue::String(d.format(DATE_FORMAT).to_string()))
            }

            (Scalar::Time, Value::Time(t)) => Some(ConstValue::String(t.format(TIME_FORMAT).to_string())),

            _ => None,
        };
        out.ok_or_else(|| format!("{} cannot represent value: {}", self.name(), value))
    }

    /// Input coercion of a value the engine has already validated.
    pub fn parse(self, value: &ConstValue) -> Result<Value, String> {
        let parsed = match (self, value) {
            (Scalar::String, ConstValue::String(s)) => Some(Value::String(s.clone())),
            (Scalar::Int, ConstValue::Number(n)) => n.as_i64().map(Value::Int),
            (Scalar::Float, ConstValue::Number(n)) => n.as_f64().map(Value::Float),
            (Scalar::Boolean, ConstValue::Boolean(b)) => Some(Value::Boolean(*b)),
            (Scalar::Id, ConstValue::String(s)) => Some(Value::String(s.clone())),
            (Scalar::Id, ConstValue::Number(n)) => Some(Value::String(n.to_string())),
            (Scalar::Date, ConstValue::String(s)) => parse_date(s).map(Value::Date),
            (Scalar::DateTime, ConstValue::String(s)) => parse_datetime(s).map(Value::DateTime),
            (Scalar::Time, ConstValue::String(s)) => parse_time(s).map(Value::Time),
            _ => None,
        };
        parsed.ok_or_else(|| format!("Invalid value for {}: {}", self.name(), value))
    }

    /// Engine registration of a non built-in scalar.
    pub(crate) fn to_engine(self) -> dynamic::Scalar {
        let mut scalar = dynamic::Scalar::new(self.name());
        if let Some(description) = self.description() {
            scalar = scalar.description(description);
        }
        scalar.validator(move |value| self.parse(value).is_ok())
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// RFC 3339, or a naive timestamp taken as UTC.
fn parse_datetime(s: &str) -> Option<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        NaiveDateTime::parse_from_str(s, NAIVE_DATETIME_FORMAT)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}
