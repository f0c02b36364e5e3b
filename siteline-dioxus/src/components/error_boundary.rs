//! Page-level error boundary.

use dioxus::prelude::*;

/// Catches render errors below it and offers a reload instead of a blank
/// window.
#[component]
pub fn PageErrorBoundary(children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: |errors: ErrorContext| {
                log::error!("Page failed to render: {errors:?}");
                rsx! {
                    div {
                        class: "page-error",
                        role: "alert",
                        h2 { "Something went wrong" }
                        p { "The page could not be displayed." }
                        button {
                            class: "btn btn-primary",
                            onclick: |_| {
                                document::eval("window.location.reload();");
                            },
                            "Reload"
                        }
                    }
                }
            },
            {children}
        }
    }
}
