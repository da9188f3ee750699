pub mod pagination;
pub mod product;
