//! sea-orm entities for the retail tables.
//!
//! Column layout mirrors the `migrations` crate one-to-one; the migration is
//! the source of truth for defaults and constraints.

pub mod payment;
pub mod product;
pub mod sale;
pub mod sale_return;
pub mod seller;

pub use payment::{Entity as Payment, Model as PaymentModel, PaymentMethod};
pub use product::{Entity as Product, Model as ProductModel};
pub use sale::{Entity as Sale, Model as SaleModel};
pub use sale_return::{Entity as SaleReturn, Model as SaleReturnModel};
pub use seller::{Entity as Seller, Model as SellerModel};
