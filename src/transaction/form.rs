//! The fields shared by the new and edit transaction forms, and turning a
//! submitted form into a payload for the record store.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    endpoints::{self, format_endpoint},
    error::FieldErrors,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, base, submit_button,
    },
    navigation::NavBar,
    transaction::{
        amount::parse_amount_input,
        core::{CATEGORIES, TransactionId, TransactionPayload, TransactionType},
    },
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The input names, which are also the keys the record store uses for field
/// errors.
pub const TYPE_FIELD: &str = "type";
pub const DATE_FIELD: &str = "transactionDate";
pub const DESCRIPTION_FIELD: &str = "description";
pub const CATEGORY_FIELD: &str = "category";
pub const AMOUNT_FIELD: &str = "amount";

const FIELDS: [&str; 5] = [
    TYPE_FIELD,
    DATE_FIELD,
    DESCRIPTION_FIELD,
    CATEGORY_FIELD,
    AMOUNT_FIELD,
];

/// The raw form submission.
///
/// Every field is kept as text so that rejected input can be shown back to
/// the user unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFormData {
    #[serde(rename = "type")]
    pub type_: Option<String>,
    #[serde(rename = "transactionDate")]
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
}

impl TransactionFormData {
    pub fn from_payload(payload: &TransactionPayload) -> Self {
        Self {
            type_: Some(payload.type_.as_str().to_owned()),
            date: Some(payload.date.to_string()),
            description: Some(payload.description.clone()),
            category: Some(payload.category.clone()),
            amount: Some(format_amount(payload.amount)),
        }
    }

    /// An empty expense dated `today`.
    pub fn new_expense(today: Date) -> Self {
        Self {
            type_: Some(TransactionType::Expense.as_str().to_owned()),
            date: Some(today.to_string()),
            ..Default::default()
        }
    }

    fn transaction_type(&self) -> Option<TransactionType> {
        match self.type_.as_deref() {
            Some("EXPENSE") => Some(TransactionType::Expense),
            Some("INCOME") => Some(TransactionType::Income),
            _ => None,
        }
    }

    /// Check the submission and build the payload to send.
    ///
    /// # Errors
    /// Returns a message per invalid field, keyed by input name.
    pub fn validate(&self) -> Result<TransactionPayload, FieldErrors> {
        let mut errors = FieldErrors::new();

        let type_ = self.transaction_type();
        if type_.is_none() {
            errors.insert(TYPE_FIELD.to_owned(), "Choose expense or income.".to_owned());
        }

        let date = Date::parse(self.date.as_deref().unwrap_or_default().trim(), DATE_FORMAT).ok();
        if date.is_none() {
            errors.insert(DATE_FIELD.to_owned(), "Enter a valid date.".to_owned());
        }

        let amount = parse_amount_input(self.amount.as_deref().unwrap_or_default())
            .inspect_err(|error| {
                errors.insert(AMOUNT_FIELD.to_owned(), error.to_string());
            })
            .ok();

        match (type_, date, amount) {
            (Some(type_), Some(date), Some(amount)) => Ok(TransactionPayload {
                date,
                description: self.description.clone().unwrap_or_default().trim().to_owned(),
                category: self.category.clone().unwrap_or_default(),
                amount,
                type_,
            }),
            _ => Err(errors),
        }
    }
}

/// Show whole amounts without a decimal point, e.g. "1500" rather than "1500.00".
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        amount.to_string()
    }
}

/// Split field errors into those shown next to an input and a form level
/// message for the rest.
pub fn split_field_errors(errors: FieldErrors) -> (FieldErrors, Option<String>) {
    let (field_errors, other_errors): (FieldErrors, FieldErrors) = errors
        .into_iter()
        .partition(|(field, _)| FIELDS.contains(&field.as_str()));

    let form_error = (!other_errors.is_empty()).then(|| {
        other_errors
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(" ")
    });

    (field_errors, form_error)
}

fn field_error(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.get(field) {
            p class=(FORM_ERROR_STYLE) { (message) }
        }
    }
}

/// Render the transaction inputs filled in with `values`.
pub fn transaction_form_fields(values: &TransactionFormData, errors: &FieldErrors) -> Markup {
    let is_income = values.transaction_type() == Some(TransactionType::Income);
    let category = values.category.as_deref().unwrap_or_default();

    html! {
        div
        {
            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for (type_, checked) in [(TransactionType::Expense, !is_income), (TransactionType::Income, is_income)] {
                        @let id = format!("transaction-type-{}", type_.as_str().to_lowercase());

                        div class="flex items-center gap-3"
                        {
                            input
                                name=(TYPE_FIELD)
                                id=(id)
                                type="radio"
                                value=(type_.as_str())
                                checked[checked]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (type_.label()) }
                        }
                    }
                }
            }

            (field_error(errors, TYPE_FIELD))
        }

        div
        {
            label for=(DATE_FIELD) class=(FORM_LABEL_STYLE) { "Date" }

            input
                name=(DATE_FIELD)
                id=(DATE_FIELD)
                type="date"
                value=[values.date.as_deref()]
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors, DATE_FIELD))
        }

        div
        {
            label for=(DESCRIPTION_FIELD) class=(FORM_LABEL_STYLE) { "Description" }

            input
                name=(DESCRIPTION_FIELD)
                id=(DESCRIPTION_FIELD)
                type="text"
                placeholder="Description"
                value=[values.description.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors, DESCRIPTION_FIELD))
        }

        div
        {
            label for=(CATEGORY_FIELD) class=(FORM_LABEL_STYLE) { "Category" }

            select
                name=(CATEGORY_FIELD)
                id=(CATEGORY_FIELD)
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[category.is_empty()] { "Select a category" }

                @for label in CATEGORIES {
                    option value=(label) selected[label == category] { (label) }
                }

                // Keep categories created elsewhere selectable when editing
                @if !category.is_empty() && !CATEGORIES.contains(&category) {
                    option value=(category) selected { (category) }
                }
            }

            (field_error(errors, CATEGORY_FIELD))
        }

        div
        {
            label for=(AMOUNT_FIELD) class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name=(AMOUNT_FIELD)
                id=(AMOUNT_FIELD)
                type="text"
                inputmode="decimal"
                pattern="\\d*\\.?\\d*"
                placeholder="0"
                value=[values.amount.as_deref()]
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors, AMOUNT_FIELD))
        }
    }
}

/// Where the transaction form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Update(TransactionId),
}

/// The whole transaction form, swapped out in place when the submission is
/// rejected.
pub fn transaction_form(
    target: FormTarget,
    values: &TransactionFormData,
    errors: &FieldErrors,
    form_error: Option<&str>,
) -> Markup {
    let (hx_post, hx_put, submit_text) = match target {
        FormTarget::Create => (Some(endpoints::TRANSACTIONS_API.to_owned()), None, "Create"),
        FormTarget::Update(id) => (
            None,
            Some(format_endpoint(endpoints::TRANSACTION, id)),
            "Save changes",
        ),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            (transaction_form_fields(values, errors))

            @if let Some(form_error) = form_error {
                p class=(FORM_ERROR_STYLE) { (form_error) }
            }

            (submit_button(submit_text))

            a href=(endpoints::TRANSACTIONS_VIEW) class=(BUTTON_SECONDARY_STYLE) role="button"
            {
                "Cancel"
            }
        }
    }
}

/// A full page holding a transaction form.
pub fn transaction_form_page(title: &str, active_endpoint: &str, form: &Markup) -> Markup {
    let content = html! {
        (NavBar::new(active_endpoint).into_html())

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h2 class="text-xl font-bold" { (title) }

                (form)
            }
        }
    };

    base(title, &[], &content)
}
