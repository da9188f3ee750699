use crate::domain::{requests::empty_string_as_none, response::product::ProductResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, str::FromStr};
use validator::{Validate, ValidationError, ValidationErrors};

pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 100;

const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Raw product form as submitted by the browser. Every field stays a string so
/// that a missing or malformed value becomes a field message instead of a
/// rejected request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<i64>,

    #[serde(default)]
    #[validate(custom(function = "validate_product_code"))]
    pub product_code: String,

    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: String,

    #[serde(default)]
    #[validate(custom(function = "validate_quantity"))]
    pub quantity: String,

    #[serde(default)]
    #[validate(custom(function = "validate_category"))]
    pub category: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validated, typed input for a create (`id == None`) or an update.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveProductRequest {
    pub id: Option<i64>,
    pub product_code: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: String,
    pub description: Option<String>,
}

impl SaveProductRequest {
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

const FIELD_ORDER: [&str; 5] = ["productCode", "name", "price", "quantity", "category"];

impl ProductForm {
    /// Runs every field rule and returns one message per invalid field, in
    /// form order.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => collect_field_errors(&errors),
        }
    }

    pub fn into_request(self) -> Result<SaveProductRequest, Vec<FieldError>> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let price = parse_price(&self.price).map_err(|e| vec![to_field_error("price", &e)])?;
        let quantity =
            parse_quantity(&self.quantity).map_err(|e| vec![to_field_error("quantity", &e)])?;

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(SaveProductRequest {
            id: self.id,
            product_code: self.product_code.trim().to_string(),
            name: self.name.trim().to_string(),
            price,
            quantity,
            category: self.category.trim().to_string(),
            description,
        })
    }
}

impl From<ProductResponse> for ProductForm {
    fn from(value: ProductResponse) -> Self {
        ProductForm {
            id: Some(value.id),
            product_code: value.product_code,
            name: value.name,
            price: value.price.to_string(),
            quantity: value.quantity.to_string(),
            category: value.category,
            description: value.description.unwrap_or_default(),
        }
    }
}

fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            field_errors
                .first()
                .map(|error| to_field_error(&to_camel_case(&field), error))
        })
        .collect();

    collected.sort_by_key(|e| {
        FIELD_ORDER
            .iter()
            .position(|f| *f == e.field)
            .unwrap_or(FIELD_ORDER.len())
    });
    collected
}

fn to_field_error(field: &str, error: &ValidationError) -> FieldError {
    let message = error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Invalid {field}"));
    FieldError::new(field, message)
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_product_code(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("required", "Product code is required"));
    }
    let len = value.chars().count();
    if !(3..=20).contains(&len) {
        return Err(invalid("length", "Product code must be 3–20 characters"));
    }
    let digits = value.strip_prefix('P').unwrap_or_default();
    if !value.starts_with('P') || digits.len() < 3 || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid(
            "pattern",
            "Product code must start with 'P' followed by at least 3 digits",
        ));
    }
    Ok(())
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("required", "Product name is required"));
    }
    let len = value.chars().count();
    if !(3..=100).contains(&len) {
        return Err(invalid("length", "Name must be 3–100 characters"));
    }
    Ok(())
}

fn validate_price(value: &str) -> Result<(), ValidationError> {
    parse_price(value).map(|_| ())
}

fn validate_quantity(value: &str) -> Result<(), ValidationError> {
    parse_quantity(value).map(|_| ())
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("required", "Category is required"));
    }
    if value.chars().count() > 50 {
        return Err(invalid("length", "Category must be at most 50 characters"));
    }
    Ok(())
}

fn parse_price(value: &str) -> Result<Decimal, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("required", "Price is required"));
    }
    let price = Decimal::from_str(value).map_err(|_| invalid("number", "Price must be a number"))?;
    if price < MIN_PRICE {
        return Err(invalid("range", "Price must be greater than 0"));
    }
    if price > MAX_PRICE {
        return Err(invalid("range", "Price is too high"));
    }
    Ok(price.round_dp(2))
}

fn parse_quantity(value: &str) -> Result<i32, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("required", "Quantity is required"));
    }
    let quantity = value
        .parse::<i32>()
        .map_err(|_| invalid("integer", "Quantity must be a whole number"))?;
    if quantity < 0 {
        return Err(invalid("range", "Quantity cannot be negative"));
    }
    Ok(quantity)
}

/// Multi-criteria filter. A `None` (or, before [`ProductFilter::normalized`],
/// a blank string) means "no constraint on this column".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    pub fn normalized(self) -> Self {
        Self {
            name: blank_to_none(self.name),
            category: blank_to_none(self.category),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.name.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.category.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearchQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_price: Option<Decimal>,
}

impl From<AdvancedSearchQuery> for ProductFilter {
    fn from(value: AdvancedSearchQuery) -> Self {
        ProductFilter {
            name: value.name,
            category: value.category,
            min_price: value.min_price,
            max_price: value.max_price,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchProductsQuery {
    pub keyword: String,

    #[serde(default)]
    pub page: u32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}
