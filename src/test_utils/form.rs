use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|error| panic!("Bad selector {css:?}: {error}"))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&selector("form"))
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("Form has no {attribute} attribute"));

    assert_eq!(got, endpoint, "want {attribute}=\"{endpoint}\", got {got:?}");
}

/// Assert that the form has a required input called `name` with the given type.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = form
        .select(&selector(&format!("input[name=\"{name}\"]")))
        .next()
        .unwrap_or_else(|| panic!("No input named {name:?}"));

    let got_type = input.value().attr("type").unwrap_or_default();
    assert_eq!(got_type, type_, "input {name:?} should have type {type_:?}");
    assert!(
        input.value().attr("required").is_some(),
        "input {name:?} should be required"
    );
}

/// The `value` attribute of the input called `name`.
#[track_caller]
pub(crate) fn input_value<'a>(html: &'a Html, name: &str) -> Option<&'a str> {
    html.select(&selector(&format!("input[name=\"{name}\"]")))
        .next()
        .unwrap_or_else(|| panic!("No input named {name:?}"))
        .value()
        .attr("value")
}

/// Assert the form level error message, the first error paragraph in the form.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want: &str) {
    let got = form
        .select(&selector("p.text-red-500"))
        .next()
        .map(text_of)
        .expect("No error message found");

    assert_eq!(got, want);
}

/// Assert the error shown next to the input or select called `field`.
///
/// Every field is wrapped in a div together with its error paragraph, so the
/// message is looked up in the innermost div holding both.
#[track_caller]
pub(crate) fn assert_field_error(html: &Html, field: &str, want: &str) {
    let control = selector(&format!("input[name=\"{field}\"], select[name=\"{field}\"]"));
    let error = selector("p.text-red-500");

    let got = html
        .select(&selector("div"))
        .filter(|div| div.select(&control).next().is_some())
        .filter_map(|div| div.select(&error).next())
        .last()
        .map(text_of)
        .unwrap_or_else(|| panic!("No error message for field {field:?}"));

    assert_eq!(got, want, "unexpected error for field {field:?}");
}
