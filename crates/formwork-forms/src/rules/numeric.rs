use super::{Rule, RuleViolation, impl_with_message, text_leaves, violation};
use formwork_core::FieldValue;
use indexmap::IndexMap;

/// Numeric value of every leaf, `None` if any leaf is not a number
fn numbers(value: &FieldValue) -> Option<Vec<f64>> {
	text_leaves(value)
		.iter()
		.map(|leaf| leaf.trim().parse::<f64>().ok().filter(|n| n.is_finite()))
		.collect()
}

fn format_bound(bound: f64) -> String {
	if bound.fract() == 0.0 && bound.abs() < 1e15 {
		format!("{}", bound as i64)
	} else {
		bound.to_string()
	}
}

/// Numbers no smaller than a bound
#[derive(Debug, Clone)]
pub struct Min {
	min: f64,
	message: Option<String>,
}

impl Min {
	pub fn new(min: f64) -> Self {
		Self { min, message: None }
	}
}

impl_with_message!(Min);

impl Rule for Min {
	fn name(&self) -> &'static str {
		"min"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		match numbers(value) {
			Some(values) if values.iter().all(|n| *n >= self.min) => Ok(()),
			_ => Err(violation(self.name(), &self.message, || {
				format!(
					"Ensure this value is greater than or equal to {}.",
					format_bound(self.min)
				)
			})),
		}
	}
}

/// Numbers no larger than a bound
#[derive(Debug, Clone)]
pub struct Max {
	max: f64,
	message: Option<String>,
}

impl Max {
	pub fn new(max: f64) -> Self {
		Self { max, message: None }
	}
}

impl_with_message!(Max);

impl Rule for Max {
	fn name(&self) -> &'static str {
		"max"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		match numbers(value) {
			Some(values) if values.iter().all(|n| *n <= self.max) => Ok(()),
			_ => Err(violation(self.name(), &self.message, || {
				format!(
					"Ensure this value is less than or equal to {}.",
					format_bound(self.max)
				)
			})),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(FieldValue::Integer(18), true)]
	#[case(FieldValue::text("17.5"), false)]
	#[case(FieldValue::text("abc"), false)]
	#[case(FieldValue::Blank, true)]
	fn test_min(#[case] value: FieldValue, #[case] ok: bool) {
		assert_eq!(Min::new(18.0).check("age", &value, &IndexMap::new()).is_ok(), ok);
	}

	#[rstest]
	fn test_max_message_names_bound() {
		let err = Max::new(10.0)
			.check("qty", &FieldValue::Integer(11), &IndexMap::new())
			.unwrap_err();

		assert_eq!(err.message, "Ensure this value is less than or equal to 10.");
	}
}
