//! Форма "Nueva falla"
//!
//! MVVM, как в остальных формах:
//! - view_model.rs: сигналы и команды поверх контроллера защиты от дубликатов
//! - view.rs: Leptos-компонент (чистый UI)

mod view;
mod view_model;

pub use view::FallaNueva;
pub use view_model::FallaNuevaViewModel;
