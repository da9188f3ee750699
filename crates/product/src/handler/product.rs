use crate::{
    domain::requests::product::{
        AdvancedSearchQuery, FieldError, ListProductsQuery, PageRequest, ProductFilter,
        ProductForm, SearchProductsQuery, blank_to_none,
    },
    flash::{Flash, redirect_with_flash, take_flash},
    middleware::ValidatedQuery,
    service::command::DUPLICATE_CODE_MESSAGE,
    state::AppState,
    views::{HtmlPage, PageNav, ProductFormTemplate, ProductListTemplate, SearchEcho, page},
};
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use shared::errors::ServiceError;
use std::sync::Arc;
use tracing::{error, info, warn};

const PRODUCTS_PATH: &str = "/products";

pub const SAVED_MESSAGE: &str = "Product saved successfully!";
pub const DELETED_MESSAGE: &str = "Product deleted successfully!";
pub const NOT_FOUND_MESSAGE: &str = "Product not found";

pub async fn root() -> Redirect {
    Redirect::to(PRODUCTS_PATH)
}

/// Store failure on a read: the list page with an error message and no rows,
/// so the user can still navigate.
fn list_failed(err: ServiceError) -> HtmlPage<ProductListTemplate> {
    error!("❌ Failed to load products: {err}");
    HtmlPage(
        StatusCode::INTERNAL_SERVER_ERROR,
        ProductListTemplate::new(Vec::new(), Vec::new())
            .with_flash(Some(Flash::error(format!("Error: {err}")))),
    )
}

async fn load_list(
    state: &AppState,
    category: Option<&str>,
) -> Result<ProductListTemplate, ServiceError> {
    let query = &state.di_container.product_query;

    let products = match category {
        Some(category) => query.find_by_category(category).await?,
        None => query.find_all().await?,
    };
    let categories = query.find_all_categories().await?;

    Ok(ProductListTemplate::new(products, categories).with_selected_category(category))
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedQuery(params): ValidatedQuery<ListProductsQuery>,
) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    let category = blank_to_none(params.category);

    let body = match load_list(&state, category.as_deref()).await {
        Ok(view) => page(view.with_flash(flash)),
        Err(err) => list_failed(err),
    };

    (jar, body)
}

async fn load_advanced_search(
    state: &AppState,
    filter: ProductFilter,
) -> Result<ProductListTemplate, ServiceError> {
    let query = &state.di_container.product_query;

    let products = if filter.is_unset() {
        query.find_all().await?
    } else {
        query.advanced_search(filter).await?
    };
    let categories = query.find_all_categories().await?;

    Ok(ProductListTemplate::new(products, categories))
}

pub async fn advanced_search(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(params): ValidatedQuery<AdvancedSearchQuery>,
) -> impl IntoResponse {
    let echo = SearchEcho {
        name: params.name.clone().unwrap_or_default(),
        category: params.category.clone().unwrap_or_default(),
        min_price: params.min_price.map(|p| p.to_string()).unwrap_or_default(),
        max_price: params.max_price.map(|p| p.to_string()).unwrap_or_default(),
        keyword: String::new(),
    };

    match load_advanced_search(&state, ProductFilter::from(params)).await {
        Ok(view) => page(view.with_search(echo)),
        Err(err) => list_failed(err),
    }
}

async fn load_search(
    state: &AppState,
    keyword: &str,
    page_request: PageRequest,
) -> Result<ProductListTemplate, ServiceError> {
    let query = &state.di_container.product_query;

    let result = query.search_paginated(keyword, page_request).await?;
    let categories = query.find_all_categories().await?;

    let nav = PageNav::new(keyword, &result.pagination);
    Ok(ProductListTemplate::new(result.items, categories).with_page(nav))
}

pub async fn search_products(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(params): ValidatedQuery<SearchProductsQuery>,
) -> impl IntoResponse {
    let page_request = PageRequest::new(params.page, params.size);

    match load_search(&state, &params.keyword, page_request).await {
        Ok(view) => page(view.with_search(SearchEcho {
            keyword: params.keyword,
            ..Default::default()
        })),
        Err(err) => list_failed(err),
    }
}

pub async fn new_product_form() -> impl IntoResponse {
    page(ProductFormTemplate::new(ProductForm::default(), &[]))
}

pub async fn edit_product_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Response {
    match state.di_container.product_query.find_by_id(id).await {
        Ok(product) => {
            page(ProductFormTemplate::new(ProductForm::from(product), &[])).into_response()
        }
        Err(err) if err.is_not_found() => {
            warn!("⚠️ Edit requested for missing product ID {id}");
            redirect_with_flash(jar, Flash::error(NOT_FOUND_MESSAGE), PRODUCTS_PATH)
                .into_response()
        }
        Err(err) => {
            redirect_with_flash(jar, Flash::error(format!("Error: {err}")), PRODUCTS_PATH)
                .into_response()
        }
    }
}

fn invalid_form(form: ProductForm, errors: &[FieldError]) -> Response {
    HtmlPage(
        StatusCode::UNPROCESSABLE_ENTITY,
        ProductFormTemplate::new(form, errors),
    )
    .into_response()
}

pub async fn save_product(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ProductForm>,
) -> Response {
    let command = &state.di_container.product_command;

    let request = match form.clone().into_request() {
        Ok(request) => request,
        Err(errors) => {
            info!("📝 Product form rejected with {} field error(s)", errors.len());
            return invalid_form(form, &errors);
        }
    };

    match command.is_product_code_duplicate(&request).await {
        Ok(false) => {}
        Ok(true) => {
            return invalid_form(
                form,
                &[FieldError::new("productCode", DUPLICATE_CODE_MESSAGE)],
            );
        }
        Err(err) => {
            return redirect_with_flash(jar, Flash::error(format!("Error: {err}")), PRODUCTS_PATH)
                .into_response();
        }
    }

    let flash = match command.save_product(&request).await {
        Ok(_) => Flash::success(SAVED_MESSAGE),
        Err(err) => Flash::error(format!("Error: {err}")),
    };

    redirect_with_flash(jar, flash, PRODUCTS_PATH).into_response()
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let flash = match state.di_container.product_command.delete_product(id).await {
        Ok(()) => Flash::success(DELETED_MESSAGE),
        Err(err) if err.is_not_found() => {
            Flash::error(format!("Error deleting product: {NOT_FOUND_MESSAGE}"))
        }
        Err(err) => Flash::error(format!("Error deleting product: {err}")),
    };

    redirect_with_flash(jar, flash, PRODUCTS_PATH)
}

pub fn product_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/products", get(list_products))
        .route("/products/advanced-search", get(advanced_search))
        .route("/products/search", get(search_products))
        .route("/products/new", get(new_product_form))
        .route("/products/edit/{id}", get(edit_product_form))
        .route("/products/save", post(save_product))
        .route("/products/delete/{id}", get(delete_product))
        .with_state(app_state)
}
