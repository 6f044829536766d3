pub mod admins;
pub mod auth;
pub mod cart;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod storefront;
