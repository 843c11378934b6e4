//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    IdPath, ValidatedJson,
    errors::responses::{
        BadRequestArgumentResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    Brand, BrandFacet, Category, CategoryFacet, CountResponse, CreateProduct, CreateSku,
    CreateVariant, Gender, MessageResponse, NamedCount, PageQuery, PriceTable, PriceTableLink,
    Product, ProductDetails, ProductFacets, ProductFilter, ProductType, ProductWithVariants,
    PromptDeliveryCounts, Sku, SkuDetails, Subcategory, UpdateProduct, Variant, VariantDetails,
    VariantWithSkus,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        count_products,
        product_filters,
        list_deleted_products,
        get_deleted_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product, ProductDetails, ProductWithVariants, Variant, VariantDetails,
            VariantWithSkus, Sku, SkuDetails, PriceTable, PriceTableLink, Brand, Category,
            Subcategory, ProductType, Gender, CreateProduct, CreateVariant, CreateSku,
            UpdateProduct, ProductFilter, PageQuery, CountResponse, MessageResponse,
            ProductFacets, BrandFacet, CategoryFacet, NamedCount, PromptDeliveryCounts
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestArgumentResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
///
/// Literal segments are registered before `/{id}`.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/count", get(count_products))
        .route("/filters", get(product_filters))
        .route("/deleted", get(list_deleted_products))
        .route("/deleted/{id}", get(get_deleted_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List active products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Page of active products", body = Vec<ProductDetails>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<Json<Vec<ProductDetails>>> {
    let products = service.list(filter).await?;
    Ok(Json(products))
}

/// Create a product with its variants and SKUs
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = ProductWithVariants),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Count active products
#[utoipa::path(
    get,
    path = "/count",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Product count", body = CountResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn count_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<Json<CountResponse>> {
    let count = service.count(filter).await?;
    Ok(Json(CountResponse { count }))
}

/// Facet counts for catalog filters
#[utoipa::path(
    get,
    path = "/filters",
    tag = "Products",
    responses(
        (status = 200, description = "Facet counts", body = ProductFacets),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn product_filters<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<ProductFacets>> {
    let facets = service.filters().await?;
    Ok(Json(facets))
}

/// List soft-deleted products
#[utoipa::path(
    get,
    path = "/deleted",
    tag = "Products",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of deleted products", body = Vec<ProductDetails>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_deleted_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<PageQuery>,
) -> ProductResult<Json<Vec<ProductDetails>>> {
    let products = service.list_deleted(query).await?;
    Ok(Json(products))
}

/// Get a soft-deleted product by ID
#[utoipa::path(
    get,
    path = "/deleted/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product found", body = ProductDetails),
        (status = 400, response = BadRequestArgumentResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_deleted_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductDetails>> {
    let product = service.get_deleted(id).await?;
    Ok(Json(product))
}

/// Get an active product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDetails),
        (status = 400, response = BadRequestArgumentResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductDetails>> {
    let product = service.get(id).await?;
    Ok(Json(product))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update(id, input).await?;
    Ok(Json(product))
}

/// Soft delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted successfully", body = MessageResponse),
        (status = 400, response = BadRequestArgumentResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<MessageResponse>> {
    service.soft_delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProductError;
    use crate::fixtures::{
        product, product_details, product_with_variants, sku_details, variant_details,
    };
    use crate::repository::MockProductRepository;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(mock_repo: MockProductRepository) -> Router {
        router(ProductService::new(mock_repo))
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn create_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Camiseta",
            "reference": "REF-1",
            "type": "NACIONAL",
            "gender": "UNISSEX",
            "company_id": 1,
            "brand_id": 1,
            "category_id": 1,
            "variants": [{
                "name": "Azul",
                "hex_code": "#0000ff",
                "skus": [{ "size": "M", "stock": 3, "price": 49.9, "code": "CAM-AZ-M", "erpId": "E-1" }]
            }]
        })
    }

    #[tokio::test]
    async fn test_count_route_is_not_captured_by_id() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_count_active().returning(|_| Ok(4));
        mock_repo.expect_find_active_by_id().never();

        let (status, body) = send(app(mock_repo), Method::GET, "/count", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "count": 4 }));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_active_by_id().never();

        let (status, body) = send(app(mock_repo), Method::GET, "/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid id");
    }

    #[tokio::test]
    async fn test_zero_id_is_bad_request_on_delete() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_soft_delete().never();

        let (status, body) = send(app(mock_repo), Method::DELETE, "/0", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid id");
    }

    #[tokio::test]
    async fn test_get_product_graph() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_active_by_id().returning(|id| {
            Ok(Some(product_details(
                id,
                vec![variant_details(1, vec![sku_details(1, &[3])])],
            )))
        });

        let (status, body) = send(app(mock_repo), Method::GET, "/12", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 12);
        assert_eq!(body["type"], "NACIONAL");
        let sku = &body["variants"][0]["skus"][0];
        assert!(sku.get("erpId").is_some());
        assert_eq!(sku["price_tables_skus"][0]["price_tables"]["id"], 3);
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_active_by_id().returning(|_| Ok(None));

        let (status, body) = send(app(mock_repo), Method::GET, "/5", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_returns_created() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_company_exists().returning(|_| Ok(true));
        mock_repo
            .expect_create()
            .withf(|input| input.variants[0].skus[0].erp_id.as_deref() == Some("E-1"))
            .returning(|_| Ok(product_with_variants(1)));

        let (status, body) = send(app(mock_repo), Method::POST, "/", Some(create_body())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn test_create_without_company_is_bad_request() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let mut payload = create_body();
        payload.as_object_mut().unwrap().remove("company_id");

        let (status, body) = send(app(mock_repo), Method::POST, "/", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_create_reports_nested_validation_paths() {
        let mock_repo = MockProductRepository::new();

        let mut payload = create_body();
        payload["variants"][0]["skus"][0]["code"] = "".into();

        let (status, body) = send(app(mock_repo), Method::POST, "/", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["errors"][0]["field"], "variants[0].skus[0].code");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let mock_repo = MockProductRepository::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();

        let response = app(mock_repo).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_unknown_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_update().returning(|_, _| Ok(None));

        let (status, _) = send(
            app(mock_repo),
            Method::PUT,
            "/999999",
            Some(serde_json::json!({ "name": "Novo" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_returns_scalar_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_update()
            .returning(|id, _| Ok(Some(product(id))));

        let (status, body) = send(
            app(mock_repo),
            Method::PUT,
            "/3",
            Some(serde_json::json!({ "prompt_delivery": true })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 3);
        assert!(body.get("variants").is_none());
    }

    #[tokio::test]
    async fn test_delete_message_and_repeat() {
        let mut mock_repo = MockProductRepository::new();
        let mut sequence = mockall::Sequence::new();
        mock_repo
            .expect_soft_delete()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(true));
        mock_repo
            .expect_soft_delete()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(false));

        let app = app(mock_repo);

        let (status, body) = send(app.clone(), Method::DELETE, "/5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product deleted successfully");

        let (status, _) = send(app, Method::DELETE, "/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deleted_routes() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_deleted()
            .returning(|_| Ok(vec![product_details(9, vec![])]));
        mock_repo.expect_find_deleted_by_id().returning(|_| Ok(None));

        let app = app(mock_repo);

        let (status, body) = send(app.clone(), Method::GET, "/deleted?page=x", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], 9);

        let (status, body) = send(app, Method::GET, "/deleted/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Deleted product 9 not found");
    }

    #[tokio::test]
    async fn test_persistence_failure_echoes_message() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_active()
            .returning(|_, _| Err(ProductError::Database("connection refused".to_string())));

        let (status, body) = send(app(mock_repo), Method::GET, "/?page=2&limit=5", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "connection refused");
    }

    #[tokio::test]
    async fn test_filters_shape() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_facet_counts()
            .returning(|| Ok(ProductFacets::default()));

        let (status, body) = send(app(mock_repo), Method::GET, "/filters", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["promptDelivery"], serde_json::json!({ "true": 0, "false": 0 }));
        assert_eq!(body["brands"], serde_json::json!([]));
    }
}
