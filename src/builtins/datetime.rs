//! Date and time functions, gated behind the `datetime` feature
//!
//! Timestamps travel through expressions as numbers holding Unix seconds
//! in UTC.

use super::{check_arg_count, number_arg, text_arg};
use crate::context::CallContext;
use crate::core::error::{ExpressionError, ExpressionResult};
use crate::core::value::Value;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Utc};

fn timestamp_arg(
    func_name: &'static str,
    args: &[Value],
    index: usize,
) -> ExpressionResult<DateTime<Utc>> {
    let seconds = number_arg(func_name, args, index)?;
    DateTime::from_timestamp(seconds as i64, 0).ok_or_else(|| {
        ExpressionError::invalid_argument(
            func_name,
            format!("timestamp {seconds} is out of range"),
        )
    })
}

fn unit_offset(
    func_name: &'static str,
    moment: DateTime<Utc>,
    amount: f64,
    unit: &str,
    forward: bool,
) -> ExpressionResult<DateTime<Utc>> {
    let signed = if forward { amount } else { -amount };
    let shifted = match unit {
        "seconds" => moment.checked_add_signed(Duration::seconds(signed as i64)),
        "minutes" => moment.checked_add_signed(Duration::minutes(signed as i64)),
        "hours" => moment.checked_add_signed(Duration::hours(signed as i64)),
        "days" => moment.checked_add_signed(Duration::days(signed as i64)),
        "weeks" => moment.checked_add_signed(Duration::weeks(signed as i64)),
        // A negative amount flips the direction; Months is unsigned
        "months" => {
            let months = Months::new(amount.abs() as u32);
            if forward == (amount >= 0.0) {
                moment.checked_add_months(months)
            } else {
                moment.checked_sub_months(months)
            }
        }
        "years" => {
            let months = Months::new(amount.abs() as u32 * 12);
            if forward == (amount >= 0.0) {
                moment.checked_add_months(months)
            } else {
                moment.checked_sub_months(months)
            }
        }
        other => {
            return Err(ExpressionError::invalid_argument(
                func_name,
                format!("unknown unit '{other}'"),
            ))
        }
    };
    shifted.ok_or_else(|| {
        ExpressionError::invalid_argument(func_name, "date arithmetic out of range")
    })
}

/// Current time as Unix seconds
pub fn now(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("now", args, 0)?;
    Ok(Value::number(Utc::now().timestamp() as f64))
}

/// Shift a timestamp forward by an amount of a unit
/// (seconds, minutes, hours, days, weeks, months, years)
pub fn date_add(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("date_add", args, 3)?;
    let moment = timestamp_arg("date_add", args, 0)?;
    let amount = number_arg("date_add", args, 1)?;
    let unit = text_arg("date_add", args, 2)?;
    let shifted = unit_offset("date_add", moment, amount, unit, true)?;
    Ok(Value::number(shifted.timestamp() as f64))
}

/// Shift a timestamp backward by an amount of a unit
pub fn date_subtract(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("date_subtract", args, 3)?;
    let moment = timestamp_arg("date_subtract", args, 0)?;
    let amount = number_arg("date_subtract", args, 1)?;
    let unit = text_arg("date_subtract", args, 2)?;
    let shifted = unit_offset("date_subtract", moment, amount, unit, false)?;
    Ok(Value::number(shifted.timestamp() as f64))
}

/// Difference between two timestamps in a unit, truncated toward zero
pub fn date_diff(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("date_diff", args, 3)?;
    let from = timestamp_arg("date_diff", args, 0)?;
    let to = timestamp_arg("date_diff", args, 1)?;
    let unit = text_arg("date_diff", args, 2)?;

    let span = to - from;
    let diff = match unit {
        "seconds" => span.num_seconds(),
        "minutes" => span.num_minutes(),
        "hours" => span.num_hours(),
        "days" => span.num_days(),
        "weeks" => span.num_weeks(),
        other => {
            return Err(ExpressionError::invalid_argument(
                "date_diff",
                format!("unknown unit '{other}'"),
            ))
        }
    };
    Ok(Value::number(diff as f64))
}

/// Calendar year of a timestamp
pub fn date_year(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("date_year", args, 1)?;
    let moment = timestamp_arg("date_year", args, 0)?;
    Ok(Value::number(moment.year() as f64))
}

/// Calendar month of a timestamp, 1 through 12
pub fn date_month(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("date_month", args, 1)?;
    let moment = timestamp_arg("date_month", args, 0)?;
    Ok(Value::number(moment.month() as f64))
}

/// Day of the month of a timestamp
pub fn date_day(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("date_day", args, 1)?;
    let moment = timestamp_arg("date_day", args, 0)?;
    Ok(Value::number(moment.day() as f64))
}

/// Format a timestamp with a strftime pattern
pub fn format_date(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("format_date", args, 2)?;
    let moment = timestamp_arg("format_date", args, 0)?;
    let pattern = text_arg("format_date", args, 1)?;

    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(ExpressionError::invalid_argument(
            "format_date",
            format!("invalid format pattern '{pattern}'"),
        ));
    }
    Ok(Value::text(
        moment.format_with_items(items.into_iter()).to_string(),
    ))
}

/// Parse a date or datetime string with a strftime pattern into Unix seconds.
///
/// Patterns without time fields parse as midnight UTC.
pub fn parse_date(_ctx: &CallContext<'_>, args: &[Value]) -> ExpressionResult<Value> {
    check_arg_count("parse_date", args, 2)?;
    let text = text_arg("parse_date", args, 0)?;
    let pattern = text_arg("parse_date", args, 1)?;

    let parsed = NaiveDateTime::parse_from_str(text, pattern)
        .or_else(|_| {
            NaiveDate::parse_from_str(text, pattern)
                .map(|date| date.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|e| {
            ExpressionError::invalid_argument(
                "parse_date",
                format!("cannot parse '{text}' with '{pattern}': {e}"),
            )
        })?;
    Ok(Value::number(parsed.and_utc().timestamp() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExpressionEngine;

    // 2021-03-15 12:30:00 UTC
    const TS: &str = "1615811400";

    #[test]
    fn test_calendar_parts() {
        let engine = ExpressionEngine::new();
        assert_eq!(
            engine.evaluate(&format!("date_year({TS})")).unwrap(),
            Value::number(2021.0)
        );
        assert_eq!(
            engine.evaluate(&format!("date_month({TS})")).unwrap(),
            Value::number(3.0)
        );
        assert_eq!(
            engine.evaluate(&format!("date_day({TS})")).unwrap(),
            Value::number(15.0)
        );
    }

    #[test]
    fn test_add_subtract_diff() {
        let engine = ExpressionEngine::new();
        let later = engine
            .evaluate(&format!("date_add({TS}, 2, 'days')"))
            .unwrap();
        let diff = engine
            .evaluate(&format!("date_diff({TS}, {later}, 'hours')"))
            .unwrap();
        assert_eq!(diff, Value::number(48.0));

        let back = engine
            .evaluate(&format!("date_subtract({later}, 2, 'days')"))
            .unwrap();
        assert_eq!(back, engine.evaluate(TS).unwrap());

        assert!(engine
            .evaluate(&format!("date_add({TS}, 1, 'fortnights')"))
            .is_err());
    }

    #[test]
    fn test_negative_amounts_flip_direction() {
        let engine = ExpressionEngine::new();
        let back = engine
            .evaluate(&format!("date_add({TS}, 0 - 1, 'months')"))
            .unwrap();
        assert_eq!(
            back,
            engine
                .evaluate(&format!("date_subtract({TS}, 1, 'months')"))
                .unwrap()
        );
        assert_eq!(
            engine.evaluate(&format!("date_month({back})")).unwrap(),
            Value::number(2.0)
        );

        let forward = engine
            .evaluate(&format!("date_subtract({TS}, 0 - 1, 'years')"))
            .unwrap();
        assert_eq!(
            engine.evaluate(&format!("date_year({forward})")).unwrap(),
            Value::number(2022.0)
        );
    }

    #[test]
    fn test_format_and_parse() {
        let engine = ExpressionEngine::new();
        assert_eq!(
            engine
                .evaluate(&format!("format_date({TS}, '%Y-%m-%d')"))
                .unwrap(),
            Value::text("2021-03-15")
        );
        assert_eq!(
            engine
                .evaluate("parse_date('2021-03-15 12:30:00', '%Y-%m-%d %H:%M:%S')")
                .unwrap(),
            engine.evaluate(TS).unwrap()
        );
        assert_eq!(
            engine
                .evaluate("date_day(parse_date('2021-03-15', '%Y-%m-%d'))")
                .unwrap(),
            Value::number(15.0)
        );
        assert!(engine.evaluate("parse_date('nonsense', '%Y-%m-%d')").is_err());
    }

    #[test]
    fn test_now_is_recent() {
        let engine = ExpressionEngine::new();
        let now = engine.evaluate("now()").unwrap().as_number().unwrap();
        // Some time after 2024-01-01
        assert!(now > 1_704_067_200.0);
    }
}
