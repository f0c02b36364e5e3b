//! Main application component.

use dioxus::prelude::*;

use crate::components::{ModalProvider, PageErrorBoundary};
use crate::demo::ProjectsPage;

const STYLESHEET: &str = include_str!("../assets/siteline.css");

#[component]
pub fn App() -> Element {
    rsx! {
        document::Title { "Siteline" }
        document::Style { {STYLESHEET} }

        ModalProvider {
            div {
                class: "app-container",
                header {
                    class: "app-header",
                    h1 { "Siteline" }
                    span { class: "app-subtitle", "Construction dashboard" }
                }
                main {
                    class: "app-main",
                    PageErrorBoundary {
                        ProjectsPage {}
                    }
                }
            }
        }
    }
}
