use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    currency::Currency,
    dto::{
        admins::{ActivityEntry, ActivityList, AdminList, CreateAdminRequest, Dashboard, DashboardStats},
        auth::{LoginRequest, LoginResponse},
        cart::{CartLine, CartSummary, CartUpdate},
        favorites::{FavoriteProductList, FavoriteToggle},
        orders::{CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
        products::{
            AdminProductList, CategoryList, CategoryRequest, CategoryWithCount, ProductDetail,
            ProductEditor, ProductList, ProductSummary, ProductUpload,
        },
        reviews::{RatingSummary, ReviewList, SubmitReviewRequest},
        storefront::{CurrencyRate, CurrencySettings, Deleted, Home},
    },
    models::{AdminUser, Category, Order, OrderItem, OrderStatus, Permissions, Product, Review},
    response::{ApiResponse, Meta},
    routes::{admin, admins, auth, cart, favorites, health, orders, params, products, storefront},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        storefront::home,
        storefront::currency_settings,
        storefront::set_currency,
        products::list_products,
        products::list_categories,
        products::get_product,
        products::submit_review,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::clear_cart,
        favorites::list_favorites,
        favorites::toggle_favorite,
        orders::checkout_page,
        orders::checkout,
        orders::order_success,
        auth::login,
        admin::dashboard,
        admin::add_product,
        admin::edit_product_form,
        admin::edit_product,
        admin::delete_product,
        admin::low_stock,
        admin::add_category,
        admin::edit_category,
        admin::delete_category,
        admin::list_orders,
        admin::order_details,
        admin::update_order_status,
        admin::list_reviews,
        admin::delete_review,
        admins::list_admins,
        admins::create_admin,
        admins::update_permissions,
        admins::toggle_active,
        admins::delete_admin,
        admins::list_activity,
        admins::export_activity
    ),
    components(
        schemas(
            Category,
            Product,
            Review,
            Order,
            OrderItem,
            OrderStatus,
            AdminUser,
            Permissions,
            Currency,
            CurrencyRate,
            CurrencySettings,
            Home,
            Deleted,
            ProductSummary,
            ProductList,
            ProductDetail,
            ProductEditor,
            ProductUpload,
            AdminProductList,
            CategoryWithCount,
            CategoryList,
            CategoryRequest,
            RatingSummary,
            ReviewList,
            SubmitReviewRequest,
            CartLine,
            CartSummary,
            CartUpdate,
            FavoriteToggle,
            FavoriteProductList,
            CheckoutRequest,
            OrderList,
            OrderWithItems,
            UpdateOrderStatusRequest,
            LoginRequest,
            LoginResponse,
            CreateAdminRequest,
            AdminList,
            ActivityEntry,
            ActivityList,
            Dashboard,
            DashboardStats,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            params::ActivityQuery,
            Meta,
            ApiResponse<Home>,
            ApiResponse<ProductList>,
            ApiResponse<ProductDetail>,
            ApiResponse<CartSummary>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<Dashboard>,
            ApiResponse<ActivityList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Storefront", description = "Home page and display currency"),
        (name = "Catalog", description = "Products, categories and reviews"),
        (name = "Cart", description = "Session cart"),
        (name = "Favorites", description = "Session wishlist"),
        (name = "Checkout", description = "Order placement"),
        (name = "Auth", description = "Admin sign-in"),
        (name = "Admin", description = "Back office overview"),
        (name = "Admin Products", description = "Product, category and inventory management"),
        (name = "Admin Orders", description = "Order management"),
        (name = "Admin Reviews", description = "Review moderation"),
        (name = "Admin Accounts", description = "Admin accounts and activity log"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
