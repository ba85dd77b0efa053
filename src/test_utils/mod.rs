//! Helpers shared by the handler tests.

mod fake_record_store;
mod form;
mod html;
mod http;

pub(crate) use fake_record_store::{
    FAKE_PASSWORD, FAKE_USERNAME, FakeRecordStore, VALID_RESET_TOKEN, unreachable_url,
};
pub(crate) use form::{
    assert_field_error, assert_form_error_message, assert_form_input, assert_hx_endpoint,
    input_value, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_hx_redirect, get_header};
