//! `SeaORM` entities for the sales database.

pub mod prelude;

pub mod door_count;
pub mod line_item;
pub mod order;
