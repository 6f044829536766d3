pub mod admin_activities;
pub mod admin_users;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod reviews;

pub use admin_activities::Entity as AdminActivities;
pub use admin_users::Entity as AdminUsers;
pub use categories::Entity as Categories;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use reviews::Entity as Reviews;
