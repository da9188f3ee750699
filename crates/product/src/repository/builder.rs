//! One SQL builder per retrieval variant. Every builder starts from the same
//! column list so rows always decode into [`crate::model::product::Product`].

use crate::domain::requests::product::{PageRequest, ProductFilter};
use sqlx::{Postgres, QueryBuilder};

pub const PRODUCT_COLUMNS: &str =
    "id, product_code, name, price, quantity, category, description, created_at";

pub const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (product_code, name, price, quantity, category, description)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, product_code, name, price, quantity, category, description, created_at
"#;

pub const UPDATE_PRODUCT: &str = r#"
    UPDATE products
    SET product_code = $2,
        name = $3,
        price = $4,
        quantity = $5,
        category = $6,
        description = $7
    WHERE id = $1
    RETURNING id, product_code, name, price, quantity, category, description, created_at
"#;

pub const DELETE_PRODUCT: &str = "DELETE FROM products WHERE id = $1";

pub const FIND_ALL_CATEGORIES: &str = "SELECT DISTINCT category FROM products ORDER BY category";

pub const EXISTS_BY_PRODUCT_CODE: &str =
    "SELECT EXISTS(SELECT 1 FROM products WHERE product_code = $1)";

pub const EXISTS_BY_PRODUCT_CODE_AND_ID_NOT: &str =
    "SELECT EXISTS(SELECT 1 FROM products WHERE product_code = $1 AND id <> $2)";

/// Escapes LIKE metacharacters so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn contains_pattern(keyword: &str) -> String {
    format!("%{}%", escape_like(keyword))
}

fn select_products() -> QueryBuilder<'static, Postgres> {
    QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"))
}

fn push_name_contains(builder: &mut QueryBuilder<'static, Postgres>, keyword: &str) {
    builder
        .push("name ILIKE ")
        .push_bind(contains_pattern(keyword))
        .push(" ESCAPE '\\'");
}

/// Appends a `WHERE` clause holding one conjunct per set filter. With no
/// filter set the clause is `WHERE TRUE`, i.e. an unconditional match.
pub fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE TRUE");

    if let Some(name) = filter.name.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND ");
        push_name_contains(builder, name);
    }
    if let Some(category) = filter.category.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND category = ").push_bind(category.to_string());
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND price <= ").push_bind(max_price);
    }
}

pub fn find_all() -> QueryBuilder<'static, Postgres> {
    let mut builder = select_products();
    builder.push(" ORDER BY id");
    builder
}

pub fn find_by_id(id: i64) -> QueryBuilder<'static, Postgres> {
    let mut builder = select_products();
    builder.push(" WHERE id = ").push_bind(id);
    builder
}

pub fn find_by_category(category: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = select_products();
    builder
        .push(" WHERE category = ")
        .push_bind(category.to_string())
        .push(" ORDER BY id");
    builder
}

pub fn find_by_category_order_by_price(category: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = select_products();
    builder
        .push(" WHERE category = ")
        .push_bind(category.to_string())
        .push(" ORDER BY price ASC, id");
    builder
}

pub fn search_by_name(keyword: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = select_products();
    builder.push(" WHERE ");
    push_name_contains(&mut builder, keyword);
    builder.push(" ORDER BY id");
    builder
}

pub fn search(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = select_products();
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY id");
    builder
}

pub fn search_by_name_page(keyword: &str, page: PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut builder = search_by_name(keyword);
    builder
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
    builder
}

pub fn count_by_name(keyword: &str) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM products WHERE ");
    push_name_contains(&mut builder, keyword);
    builder
}
