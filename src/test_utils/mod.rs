#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use db::{get_test_app_state, get_test_store, get_test_transaction_state};
pub(crate) use form::{
    assert_form_error_message, assert_form_input_with_value, assert_form_select_with_value,
    assert_form_submit_button_with_text, must_get_form,
};
pub(crate) use html::{assert_valid_html, must_get_text, parse_html_document};
pub(crate) use http::{assert_content_type, must_get_json};
