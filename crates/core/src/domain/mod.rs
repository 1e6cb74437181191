pub mod car;
pub mod contact;
pub mod conversation;
pub mod listing;
pub mod plan;
pub mod repair_shop;
pub mod user;
