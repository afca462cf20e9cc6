pub mod product;

pub use product::{Category, Product, ProductDraft, ProductError, ProductPayload, ProductRow};
