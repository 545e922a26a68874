use crate::domain::a001_falla::ui::nueva::FallaNueva;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="container">
            <FallaNueva />
        </main>
    }
}
