pub mod nueva;
