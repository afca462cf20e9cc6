pub mod json_body;
pub mod product_id;
pub mod query;

pub use json_body::{check_content_type, JsonBody, JSON_MEDIA_TYPE};
pub use product_id::ProductId;
pub use query::ApiQuery;
