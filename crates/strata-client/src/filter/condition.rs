//! Per-field filter conditions.
//!
//! Operator sets are split by the field's semantic type (string, number,
//! date, boolean) so that string-only predicates such as `$contains` cannot
//! be attached to a numeric field in the first place. Every operator is
//! optional and several may be set on the same condition, which the server
//! treats as an implicit AND on that field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Condition over a string-valued field.
///
/// Carries the full operator set, including the case-insensitive `*i`
/// variants and the substring/prefix/suffix predicates that only make sense
/// for text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringCondition {
    #[serde(rename = "$eq", default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<String>,

    #[serde(rename = "$eqi", default, skip_serializing_if = "Option::is_none")]
    pub eqi: Option<String>,

    #[serde(rename = "$ne", default, skip_serializing_if = "Option::is_none")]
    pub ne: Option<String>,

    #[serde(rename = "$nei", default, skip_serializing_if = "Option::is_none")]
    pub nei: Option<String>,

    #[serde(rename = "$in", default, skip_serializing_if = "Vec::is_empty")]
    pub is_in: Vec<String>,

    #[serde(rename = "$notIn", default, skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<String>,

    #[serde(rename = "$null", default, skip_serializing_if = "Option::is_none")]
    pub null: Option<bool>,

    #[serde(rename = "$notNull", default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,

    #[serde(rename = "$lt", default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,

    #[serde(rename = "$lte", default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,

    #[serde(rename = "$gt", default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,

    #[serde(rename = "$gte", default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,

    #[serde(rename = "$contains", default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,

    #[serde(rename = "$containsi", default, skip_serializing_if = "Option::is_none")]
    pub containsi: Option<String>,

    #[serde(rename = "$ncontains", default, skip_serializing_if = "Option::is_none")]
    pub ncontains: Option<String>,

    #[serde(rename = "$ncontainsi", default, skip_serializing_if = "Option::is_none")]
    pub ncontainsi: Option<String>,

    #[serde(rename = "$startsWith", default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,

    #[serde(rename = "$startsWithi", default, skip_serializing_if = "Option::is_none")]
    pub starts_withi: Option<String>,

    #[serde(rename = "$endsWith", default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,

    #[serde(rename = "$endsWithi", default, skip_serializing_if = "Option::is_none")]
    pub ends_withi: Option<String>,
}

impl StringCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, value: impl Into<String>) -> Self {
        self.eq = Some(value.into());
        self
    }

    /// Case-insensitive equality.
    pub fn eqi(mut self, value: impl Into<String>) -> Self {
        self.eqi = Some(value.into());
        self
    }

    pub fn ne(mut self, value: impl Into<String>) -> Self {
        self.ne = Some(value.into());
        self
    }

    /// Case-insensitive inequality.
    pub fn nei(mut self, value: impl Into<String>) -> Self {
        self.nei = Some(value.into());
        self
    }

    pub fn is_in<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_in = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn not_in<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_in = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn null(mut self, is_null: bool) -> Self {
        self.null = Some(is_null);
        self
    }

    pub fn not_null(mut self, is_not_null: bool) -> Self {
        self.not_null = Some(is_not_null);
        self
    }

    pub fn lt(mut self, value: impl Into<String>) -> Self {
        self.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<String>) -> Self {
        self.lte = Some(value.into());
        self
    }

    pub fn gt(mut self, value: impl Into<String>) -> Self {
        self.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<String>) -> Self {
        self.gte = Some(value.into());
        self
    }

    pub fn contains(mut self, value: impl Into<String>) -> Self {
        self.contains = Some(value.into());
        self
    }

    pub fn containsi(mut self, value: impl Into<String>) -> Self {
        self.containsi = Some(value.into());
        self
    }

    pub fn ncontains(mut self, value: impl Into<String>) -> Self {
        self.ncontains = Some(value.into());
        self
    }

    pub fn ncontainsi(mut self, value: impl Into<String>) -> Self {
        self.ncontainsi = Some(value.into());
        self
    }

    pub fn starts_with(mut self, value: impl Into<String>) -> Self {
        self.starts_with = Some(value.into());
        self
    }

    pub fn starts_withi(mut self, value: impl Into<String>) -> Self {
        self.starts_withi = Some(value.into());
        self
    }

    pub fn ends_with(mut self, value: impl Into<String>) -> Self {
        self.ends_with = Some(value.into());
        self
    }

    pub fn ends_withi(mut self, value: impl Into<String>) -> Self {
        self.ends_withi = Some(value.into());
        self
    }
}

/// Condition over a numeric field.
///
/// Operands are [`serde_json::Number`] so integer precision survives the
/// trip onto the wire. Float operands go through
/// [`serde_json::Number::from_f64`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberCondition {
    #[serde(rename = "$eq", default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<Number>,

    #[serde(rename = "$ne", default, skip_serializing_if = "Option::is_none")]
    pub ne: Option<Number>,

    #[serde(rename = "$in", default, skip_serializing_if = "Vec::is_empty")]
    pub is_in: Vec<Number>,

    #[serde(rename = "$notIn", default, skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<Number>,

    #[serde(rename = "$null", default, skip_serializing_if = "Option::is_none")]
    pub null: Option<bool>,

    #[serde(rename = "$notNull", default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,

    #[serde(rename = "$lt", default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<Number>,

    #[serde(rename = "$lte", default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<Number>,

    #[serde(rename = "$gt", default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<Number>,

    #[serde(rename = "$gte", default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<Number>,

    /// Inclusive range, serialized as a 2-element array.
    #[serde(rename = "$between", default, skip_serializing_if = "Option::is_none")]
    pub between: Option<(Number, Number)>,
}

impl NumberCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, value: impl Into<Number>) -> Self {
        self.eq = Some(value.into());
        self
    }

    pub fn ne(mut self, value: impl Into<Number>) -> Self {
        self.ne = Some(value.into());
        self
    }

    pub fn is_in<I, N>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Number>,
    {
        self.is_in = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn not_in<I, N>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Number>,
    {
        self.not_in = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn null(mut self, is_null: bool) -> Self {
        self.null = Some(is_null);
        self
    }

    pub fn not_null(mut self, is_not_null: bool) -> Self {
        self.not_null = Some(is_not_null);
        self
    }

    pub fn lt(mut self, value: impl Into<Number>) -> Self {
        self.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<Number>) -> Self {
        self.lte = Some(value.into());
        self
    }

    pub fn gt(mut self, value: impl Into<Number>) -> Self {
        self.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<Number>) -> Self {
        self.gte = Some(value.into());
        self
    }

    pub fn between(mut self, low: impl Into<Number>, high: impl Into<Number>) -> Self {
        self.between = Some((low.into(), high.into()));
        self
    }
}

/// Condition over a date/datetime field. Operands serialize as RFC 3339.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateCondition {
    #[serde(rename = "$eq", default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<DateTime<Utc>>,

    #[serde(rename = "$ne", default, skip_serializing_if = "Option::is_none")]
    pub ne: Option<DateTime<Utc>>,

    #[serde(rename = "$in", default, skip_serializing_if = "Vec::is_empty")]
    pub is_in: Vec<DateTime<Utc>>,

    #[serde(rename = "$notIn", default, skip_serializing_if = "Vec::is_empty")]
    pub not_in: Vec<DateTime<Utc>>,

    #[serde(rename = "$null", default, skip_serializing_if = "Option::is_none")]
    pub null: Option<bool>,

    #[serde(rename = "$notNull", default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,

    #[serde(rename = "$lt", default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<DateTime<Utc>>,

    #[serde(rename = "$lte", default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<DateTime<Utc>>,

    #[serde(rename = "$gt", default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<DateTime<Utc>>,

    #[serde(rename = "$gte", default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<DateTime<Utc>>,

    /// Inclusive range, serialized as a 2-element array.
    #[serde(rename = "$between", default, skip_serializing_if = "Option::is_none")]
    pub between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl DateCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, value: DateTime<Utc>) -> Self {
        self.eq = Some(value);
        self
    }

    pub fn ne(mut self, value: DateTime<Utc>) -> Self {
        self.ne = Some(value);
        self
    }

    pub fn is_in<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        self.is_in = values.into_iter().collect();
        self
    }

    pub fn not_in<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        self.not_in = values.into_iter().collect();
        self
    }

    pub fn null(mut self, is_null: bool) -> Self {
        self.null = Some(is_null);
        self
    }

    pub fn not_null(mut self, is_not_null: bool) -> Self {
        self.not_null = Some(is_not_null);
        self
    }

    pub fn lt(mut self, value: DateTime<Utc>) -> Self {
        self.lt = Some(value);
        self
    }

    pub fn lte(mut self, value: DateTime<Utc>) -> Self {
        self.lte = Some(value);
        self
    }

    pub fn gt(mut self, value: DateTime<Utc>) -> Self {
        self.gt = Some(value);
        self
    }

    pub fn gte(mut self, value: DateTime<Utc>) -> Self {
        self.gte = Some(value);
        self
    }

    pub fn between(mut self, low: DateTime<Utc>, high: DateTime<Utc>) -> Self {
        self.between = Some((low, high));
        self
    }
}

/// Condition over a boolean field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoolCondition {
    #[serde(rename = "$eq", default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<bool>,

    #[serde(rename = "$ne", default, skip_serializing_if = "Option::is_none")]
    pub ne: Option<bool>,

    #[serde(rename = "$null", default, skip_serializing_if = "Option::is_none")]
    pub null: Option<bool>,

    #[serde(rename = "$notNull", default, skip_serializing_if = "Option::is_none")]
    pub not_null: Option<bool>,
}

impl BoolCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, value: bool) -> Self {
        self.eq = Some(value);
        self
    }

    pub fn ne(mut self, value: bool) -> Self {
        self.ne = Some(value);
        self
    }

    pub fn null(mut self, is_null: bool) -> Self {
        self.null = Some(is_null);
        self
    }

    pub fn not_null(mut self, is_not_null: bool) -> Self {
        self.not_null = Some(is_not_null);
        self
    }
}

/// A condition of any semantic type.
///
/// Serializes as a flat map of `$operator` keys. Deserialization picks the
/// variant whose operand types fit; unknown operator keys fail every variant
/// and surface as an error instead of silently passing a typo through to a
/// server that would ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterCondition {
    Number(NumberCondition),
    Date(DateCondition),
    Bool(BoolCondition),
    String(StringCondition),
}

impl From<StringCondition> for FilterCondition {
    fn from(condition: StringCondition) -> Self {
        FilterCondition::String(condition)
    }
}

impl From<NumberCondition> for FilterCondition {
    fn from(condition: NumberCondition) -> Self {
        FilterCondition::Number(condition)
    }
}

impl From<DateCondition> for FilterCondition {
    fn from(condition: DateCondition) -> Self {
        FilterCondition::Date(condition)
    }
}

impl From<BoolCondition> for FilterCondition {
    fn from(condition: BoolCondition) -> Self {
        FilterCondition::Bool(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_string_condition_wire_keys() {
        let condition = StringCondition::new()
            .eq("test")
            .ne("other")
            .contains("substring")
            .starts_with("prefix")
            .ends_with("suffix");

        let json = serde_json::to_string(&condition).unwrap();
        assert_eq!(
            json,
            r#"{"$eq":"test","$ne":"other","$contains":"substring","$startsWith":"prefix","$endsWith":"suffix"}"#
        );
    }

    #[test]
    fn test_number_condition_wire_keys() {
        let condition = NumberCondition::new()
            .gt(50u64)
            .lte(200u64)
            .between(50u64, 200u64)
            .is_in([10u64, 20, 30])
            .not_in([5u64, 15]);

        let json = serde_json::to_string(&condition).unwrap();
        assert_eq!(
            json,
            r#"{"$in":[10,20,30],"$notIn":[5,15],"$lte":200,"$gt":50,"$between":[50,200]}"#
        );
    }

    #[test]
    fn test_date_condition_rfc3339() {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        let condition = DateCondition::new().between(start, end);

        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(
            json["$between"][0].as_str().unwrap(),
            "2023-01-01T00:00:00Z"
        );
        assert_eq!(
            json["$between"][1].as_str().unwrap(),
            "2023-12-31T00:00:00Z"
        );
    }

    #[test]
    fn test_case_insensitive_variants() {
        let condition = StringCondition::new().eqi("electronics").containsi("electron");
        let json = serde_json::to_string(&condition).unwrap();
        assert_eq!(json, r#"{"$eqi":"electronics","$containsi":"electron"}"#);
    }

    #[test]
    fn test_null_checks() {
        let condition = BoolCondition::new().null(false);
        assert_eq!(serde_json::to_string(&condition).unwrap(), r#"{"$null":false}"#);

        let condition = StringCondition::new().not_null(true);
        assert_eq!(
            serde_json::to_string(&condition).unwrap(),
            r#"{"$notNull":true}"#
        );
    }

    #[test]
    fn test_untagged_variant_selection() {
        let condition: FilterCondition = serde_json::from_str(r#"{"$eq": 100}"#).unwrap();
        assert!(matches!(condition, FilterCondition::Number(_)));

        let condition: FilterCondition = serde_json::from_str(r#"{"$eq": "active"}"#).unwrap();
        assert!(matches!(condition, FilterCondition::String(_)));

        let condition: FilterCondition = serde_json::from_str(r#"{"$eq": true}"#).unwrap();
        assert!(matches!(condition, FilterCondition::Bool(_)));

        let condition: FilterCondition =
            serde_json::from_str(r#"{"$contains": "laptop", "$startsWith": "Mac"}"#).unwrap();
        assert!(matches!(condition, FilterCondition::String(_)));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        // A typoed operator must not deserialize into a lossy condition.
        let result = serde_json::from_str::<FilterCondition>(r#"{"$eqq": "test"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<StringCondition>(r#"{"$contains": "x", "$bogus": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_string_operators_not_available_on_numbers() {
        // $contains with a numeric operand fits no variant.
        let result = serde_json::from_str::<FilterCondition>(r#"{"$contains": 42}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip() {
        let condition = FilterCondition::from(
            NumberCondition::new().between(100u64, 1000u64).gte(50u64),
        );
        let json = serde_json::to_string(&condition).unwrap();
        let back: FilterCondition = serde_json::from_str(&json).unwrap();
        assert_eq!(condition, back);
    }
}
