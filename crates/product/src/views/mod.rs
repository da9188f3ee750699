use crate::{
    domain::{
        requests::product::{FieldError, ProductForm},
        response::{pagination::Pagination, product::ProductResponse},
    },
    flash::{Flash, FlashKind},
};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use shared::errors::HttpError;
use tracing::error;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: i64,
    pub product_code: String,
    pub name: String,
    pub price: String,
    pub quantity: i32,
    pub category: String,
    pub description: String,
    pub created_at: String,
}

impl From<ProductResponse> for ProductRow {
    fn from(value: ProductResponse) -> Self {
        ProductRow {
            id: value.id,
            product_code: value.product_code,
            name: value.name,
            price: format!("{:.2}", value.price),
            quantity: value.quantity,
            category: value.category,
            description: value.description.unwrap_or_default(),
            created_at: value.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

pub fn category_options(categories: Vec<String>, selected: Option<&str>) -> Vec<CategoryOption> {
    categories
        .into_iter()
        .map(|name| CategoryOption {
            selected: selected == Some(name.as_str()),
            name,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashView {
    pub css_class: &'static str,
    pub message: String,
}

impl From<Flash> for FlashView {
    fn from(value: Flash) -> Self {
        let css_class = match value.kind {
            FlashKind::Success => "alert-success",
            FlashKind::Error => "alert-error",
        };
        FlashView {
            css_class,
            message: value.message,
        }
    }
}

/// Filter inputs echoed back into the search forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchEcho {
    pub name: String,
    pub category: String,
    pub min_price: String,
    pub max_price: String,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNav {
    pub keyword: String,
    pub size: u32,
    pub display_page: u32,
    pub total_pages: i64,
    pub total_items: i64,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl PageNav {
    pub fn new(keyword: &str, pagination: &Pagination) -> Self {
        let page = pagination.page;
        PageNav {
            keyword: keyword.to_string(),
            size: pagination.page_size,
            display_page: page.saturating_add(1),
            total_pages: pagination.total_pages,
            total_items: pagination.total_items,
            prev_page: page.checked_sub(1),
            next_page: (i64::from(page) + 1 < pagination.total_pages).then(|| page + 1),
        }
    }
}

#[derive(Template, Debug)]
#[template(path = "product-list.html")]
pub struct ProductListTemplate {
    pub products: Vec<ProductRow>,
    pub categories: Vec<CategoryOption>,
    pub flash: Option<FlashView>,
    pub search: SearchEcho,
    pub page: Option<PageNav>,
}

impl ProductListTemplate {
    pub fn new(products: Vec<ProductResponse>, categories: Vec<String>) -> Self {
        ProductListTemplate {
            products: products.into_iter().map(ProductRow::from).collect(),
            categories: category_options(categories, None),
            flash: None,
            search: SearchEcho::default(),
            page: None,
        }
    }

    pub fn with_selected_category(mut self, category: Option<&str>) -> Self {
        for option in &mut self.categories {
            option.selected = category == Some(option.name.as_str());
        }
        self
    }

    pub fn with_flash(mut self, flash: Option<Flash>) -> Self {
        self.flash = flash.map(FlashView::from);
        self
    }

    pub fn with_search(mut self, search: SearchEcho) -> Self {
        self.search = search;
        self
    }

    pub fn with_page(mut self, page: PageNav) -> Self {
        self.page = Some(page);
        self
    }
}

/// One message slot per validated field; empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub product_code: String,
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub category: String,
}

impl FormErrors {
    pub fn from_fields(errors: &[FieldError]) -> Self {
        let mut out = FormErrors::default();
        for err in errors {
            let slot = match err.field.as_str() {
                "productCode" => &mut out.product_code,
                "name" => &mut out.name,
                "price" => &mut out.price,
                "quantity" => &mut out.quantity,
                "category" => &mut out.category,
                _ => continue,
            };
            if slot.is_empty() {
                *slot = err.message.clone();
            }
        }
        out
    }
}

#[derive(Template, Debug)]
#[template(path = "product-form.html")]
pub struct ProductFormTemplate {
    pub title: &'static str,
    pub id: String,
    pub form: ProductForm,
    pub errors: FormErrors,
}

impl ProductFormTemplate {
    pub fn new(form: ProductForm, errors: &[FieldError]) -> Self {
        let title = if form.id.is_some() {
            "Edit Product"
        } else {
            "Add New Product"
        };
        ProductFormTemplate {
            title,
            id: form.id.map(|id| id.to_string()).unwrap_or_default(),
            errors: FormErrors::from_fields(errors),
            form,
        }
    }
}

/// Renders an askama template into an HTML response, falling back to a JSON
/// 500 when rendering fails.
pub struct HtmlPage<T>(pub StatusCode, pub T);

impl<T: Template> IntoResponse for HtmlPage<T> {
    fn into_response(self) -> Response {
        let HtmlPage(status, template) = self;
        match template.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!("❌ Failed to render template: {}", e);
                HttpError::Internal("Failed to render page".into()).into_response()
            }
        }
    }
}

pub fn page<T: Template>(template: T) -> HtmlPage<T> {
    HtmlPage(StatusCode::OK, template)
}
