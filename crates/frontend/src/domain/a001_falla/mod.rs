pub mod api;
pub mod controller;
pub mod guard;
pub mod ui;
