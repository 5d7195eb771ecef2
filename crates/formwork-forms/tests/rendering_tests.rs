//! Rendering tests
//!
//! Component trees rendered through the shared attribute contract.

use formwork_core::{FieldValue, FormConfig};
use formwork_forms::components::{
	Button, Element, Fieldset, Form, Html, Input, Label, Legend, Render, Select, Textarea,
};
use formwork_forms::csrf::CsrfGuard;
use rstest::rstest;

#[rstest]
fn test_class_tokens_accumulate() {
	let html = Input::text("q").class("a").class("b").class("c").render();

	assert!(html.contains(r#"class="a b c""#));
}

#[rstest]
fn test_attribute_values_are_escaped_once() {
	let html = Input::text("q")
		.title(r#"say "hi" & <wave>"#)
		.render();

	assert!(html.contains(r#"title="say &quot;hi&quot; &amp; &lt;wave&gt;""#));
	assert!(!html.contains("&amp;amp;"));
}

#[rstest]
fn test_invalid_custom_attribute_is_dropped() {
	let html = Input::text("q")
		.attr("onclick\"x", "alert(1)")
		.attr("data-role", "search")
		.render();

	assert!(!html.contains("alert"));
	assert!(html.contains(r#"data-role="search""#));
}

#[rstest]
#[case("user[address][street]", "user_address_street")]
#[case("items[]", "items_0")]
#[case("2fa code", "id_2fa_code")]
fn test_label_derives_normalized_id(#[case] name: &str, #[case] id: &str) {
	let html = Input::text(name).label("Field").render();

	assert!(html.starts_with(&format!(r#"<label for="{id}">"#)));
	assert!(html.contains(&format!(r#"id="{id}""#)));
}

#[rstest]
fn test_explicit_id_wins_over_derived_one() {
	let html = Input::text("user[name]").id("who").label("Name").render();

	assert!(html.starts_with(r#"<label for="who">"#));
	assert!(!html.contains("user_name"));
}

#[rstest]
fn test_repopulated_form_tree() {
	// Arrange
	let submitted = formwork_core::value::field_map(serde_json::json!({
		"name": "<Ada>",
		"bio": "a & b",
		"plan": "pro",
	}));

	// Act
	let form = Form::new()
		.action("/account")
		.child(
			Fieldset::new()
				.legend(Legend::new("Profile"))
				.child(Input::text("name").value_from(&submitted["name"]))
				.child(Textarea::new("bio").value_from(&submitted["bio"])),
		)
		.child(
			Select::new("plan")
				.option("free", "Free")
				.option("pro", "Pro")
				.value_from(&submitted["plan"]),
		)
		.child(Button::submit("Save"));
	let html = form.render();

	// Assert
	assert!(html.starts_with(r#"<form action="/account" method="post">"#));
	assert!(html.contains(r#"value="&lt;Ada&gt;""#));
	assert!(html.contains(">a &amp; b</textarea>"));
	assert!(html.contains(r#"<option value="pro" selected>Pro</option>"#));
	assert!(html.ends_with("<button type=\"submit\">Save</button></form>"));
}

#[rstest]
fn test_form_carries_csrf_token() {
	let config = FormConfig::default();
	let guard = CsrfGuard::in_memory(config.csrf.clone());
	let token = guard.token("s").unwrap();

	let html = Form::new()
		.with_config(&config)
		.csrf(guard.hidden_input("s").unwrap())
		.child(Input::text("comment"))
		.render();

	let hidden = format!(r#"<input type="hidden" name="_csrf_token" value="{token}" />"#);
	assert!(html.contains(&hidden));
	assert!(html.find(&hidden) < html.find(r#"name="comment""#));
}

#[rstest]
fn test_html_fragment_receives_attributes() {
	let html = Html::new(r#"<div data-x="a>b">body</div>"#).id("terms").render();

	assert_eq!(html, r#"<div data-x="a>b" id="terms">body</div>"#);
}

#[rstest]
fn test_label_component_normalizes_field_name() {
	let html = Label::new("Street").for_field("user[address][street]").render();

	assert_eq!(html, r#"<label for="user_address_street">Street</label>"#);
}

#[rstest]
fn test_file_input_is_not_repopulated() {
	let html = Input::file("avatar")
		.value_from(&FieldValue::text("me.png"))
		.render();

	assert!(!html.contains("me.png"));
}
