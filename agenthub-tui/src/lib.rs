#![allow(
    dead_code,
    unused_imports,
    unused_variables,
    unused_mut,
    clippy::too_many_arguments,
    clippy::len_zero,
    clippy::needless_borrows_for_generic_args
)]

pub mod app;
pub mod data;
pub mod events;
pub mod theme;
pub mod ui;
