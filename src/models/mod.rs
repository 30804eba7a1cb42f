pub mod cart;
pub mod favorite;
pub mod order;
pub mod product;
pub mod user;
