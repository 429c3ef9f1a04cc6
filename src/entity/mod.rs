pub mod articles;
pub mod colors;
pub mod customers;
pub mod sale_lines;
pub mod sales;
pub mod sizes;
pub mod variants;

pub use articles::Entity as Articles;
pub use colors::Entity as Colors;
pub use customers::Entity as Customers;
pub use sale_lines::Entity as SaleLines;
pub use sales::Entity as Sales;
pub use sizes::Entity as Sizes;
pub use variants::Entity as Variants;
