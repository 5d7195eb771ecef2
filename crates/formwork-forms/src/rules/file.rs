use super::{Rule, RuleViolation, UPLOAD_ERR_NO_FILE, impl_with_message, violation};
use formwork_core::{FieldValue, UploadedFile};
use indexmap::IndexMap;

/// Uploaded files carried by a value; `None` when something other than a
/// file (or a list of files) was submitted
fn uploads(value: &FieldValue) -> Option<Vec<&UploadedFile>> {
	match value {
		FieldValue::File(file) => Some(vec![file]),
		FieldValue::List(items) => items.iter().map(FieldValue::as_file).collect(),
		_ => None,
	}
}

/// The value must be a successful upload within the size limits.
///
/// An upload reporting "no file sent" is treated as blank.
#[derive(Debug, Clone, Default)]
pub struct File {
	min_size: Option<u64>,
	max_size: Option<u64>,
	message: Option<String>,
}

impl File {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn min_size(mut self, bytes: u64) -> Self {
		self.min_size = Some(bytes);
		self
	}

	pub fn max_size(mut self, bytes: u64) -> Self {
		self.max_size = Some(bytes);
		self
	}

	fn check_one(&self, file: &UploadedFile) -> Result<(), String> {
		if file.error == UPLOAD_ERR_NO_FILE {
			return Ok(());
		}
		if !file.is_ok() {
			return Err(format!("The upload failed (error {}).", file.error));
		}
		if let Some(min) = self.min_size
			&& file.size < min
		{
			return Err(format!("The file must be at least {} bytes.", min));
		}
		if let Some(max) = self.max_size
			&& file.size > max
		{
			return Err(format!("The file must be at most {} bytes.", max));
		}
		Ok(())
	}
}

impl_with_message!(File);

impl Rule for File {
	fn name(&self) -> &'static str {
		"file"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		if value.is_blank() {
			return Ok(());
		}
		let Some(files) = uploads(value) else {
			return Err(violation(self.name(), &self.message, || {
				"Upload a file.".to_string()
			}));
		};
		for file in files {
			if let Err(reason) = self.check_one(file) {
				return Err(violation(self.name(), &self.message, || reason));
			}
		}
		Ok(())
	}
}

/// The reported MIME type of every upload must be allowed.
///
/// Entries ending in `/*` allow a whole family, as in `image/*`.
#[derive(Debug, Clone)]
pub struct Mime {
	allowed: Vec<String>,
	message: Option<String>,
}

impl Mime {
	pub fn new<I, S>(allowed: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			allowed: allowed
				.into_iter()
				.map(|mime| mime.into().trim().to_ascii_lowercase())
				.collect(),
			message: None,
		}
	}

	fn allows(&self, content_type: &str) -> bool {
		// Parameters such as "; charset=utf-8" do not take part in matching.
		let essence = content_type
			.split(';')
			.next()
			.unwrap_or_default()
			.trim()
			.to_ascii_lowercase();
		self.allowed.iter().any(|allowed| match allowed.strip_suffix("/*") {
			Some(family) => essence
				.split_once('/')
				.is_some_and(|(major, _)| major == family),
			None => *allowed == essence,
		})
	}
}

impl_with_message!(Mime);

impl Rule for Mime {
	fn name(&self) -> &'static str {
		"mime"
	}

	fn check(
		&self,
		_field: &str,
		value: &FieldValue,
		_data: &IndexMap<String, FieldValue>,
	) -> Result<(), RuleViolation> {
		if value.is_blank() {
			return Ok(());
		}
		let accepted = uploads(value).is_some_and(|files| {
			files
				.iter()
				.filter(|file| file.error != UPLOAD_ERR_NO_FILE)
				.all(|file| self.allows(&file.content_type))
		});
		if accepted {
			Ok(())
		} else {
			Err(violation(self.name(), &self.message, || {
				"This file type is not allowed.".to_string()
			}))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn upload(content_type: &str, size: u64) -> FieldValue {
		FieldValue::File(UploadedFile::new("f.bin", content_type, "/tmp/f", size))
	}

	#[rstest]
	#[case(upload("image/png", 10), true)]
	#[case(upload("image/png", 2000), false)]
	#[case(FieldValue::File(UploadedFile::new("f", "x/y", "", 1).with_error(3)), false)]
	#[case(FieldValue::text("not a file"), false)]
	fn test_file(#[case] value: FieldValue, #[case] ok: bool) {
		let rule = File::new().max_size(1024);

		assert_eq!(rule.check("doc", &value, &IndexMap::new()).is_ok(), ok);
	}

	#[rstest]
	#[case("image/png", true)]
	#[case("IMAGE/JPEG; q=1", true)]
	#[case("application/pdf", true)]
	#[case("application/zip", false)]
	#[case("imagex/png", false)]
	fn test_mime(#[case] content_type: &str, #[case] ok: bool) {
		let rule = Mime::new(["image/*", "application/pdf"]);

		assert_eq!(
			rule.check("doc", &upload(content_type, 1), &IndexMap::new()).is_ok(),
			ok
		);
	}
}
