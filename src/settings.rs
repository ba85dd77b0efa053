//! The settings page: where the data lives, exporting it, and the app version.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    record_store::RecordStoreState,
};

fn settings_item(title: &str, description: &str, action: Markup) -> Markup {
    html! {
        li class="flex justify-between items-center gap-4 py-4"
        {
            div
            {
                h2 class="font-semibold" { (title) }
                p class="text-sm text-gray-600 dark:text-gray-400" { (description) }
            }

            (action)
        }
    }
}

/// Renders the settings page.
pub async fn get_settings_page(State(state): State<RecordStoreState>) -> Response {
    let content = html! {
        (NavBar::new(endpoints::SETTINGS_VIEW).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-2xl p-6 rounded bg-white dark:bg-gray-800 shadow"
            {
                h1 class="text-xl font-bold mb-2" { "Settings" }

                ul class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    (settings_item(
                        "Record store",
                        "The server that stores your account and transactions.",
                        html! { code id="record-store-url" class="text-sm" { (state.record_store.base_url()) } },
                    ))

                    (settings_item(
                        "Data management",
                        "Download every transaction as a CSV file.",
                        html! { a href=(endpoints::EXPORT_TRANSACTIONS) class=(LINK_STYLE) { "Export CSV" } },
                    ))

                    (settings_item(
                        "About",
                        "The version of this app.",
                        html! { span { "v" (env!("CARGO_PKG_VERSION")) } },
                    ))

                    (settings_item(
                        "Log out",
                        "End your session with the record store.",
                        html! { a href=(endpoints::LOG_OUT) class=(LINK_STYLE) { "Log out" } },
                    ))
                }
            }
        }
    };

    base("Settings", &[], &content).into_response()
}
