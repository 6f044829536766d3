use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use sea_orm::sea_query::{Expr, Func};
use uuid::Uuid;

use crate::{
    currency::Currency,
    db::contains_pattern,
    dto::{
        products::{CategoryList, CategoryWithCount, ProductDetail, ProductList, ProductSummary},
        reviews::RatingSummary,
        storefront::{CurrencyRate, CurrencySettings, Home},
    },
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        reviews::{Column as ReviewCol, Entity as Reviews},
    },
    error::{AppError, AppResult},
    models::{Category, Product, Review},
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    session::SessionData,
    state::AppState,
};

const HOME_PRODUCT_LIMIT: u64 = 8;

pub async fn home(state: &AppState, session: &SessionData) -> AppResult<ApiResponse<Home>> {
    let categories = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let latest = Products::find()
        .order_by_desc(ProdCol::CreatedAt)
        .limit(HOME_PRODUCT_LIMIT)
        .all(&state.orm)
        .await?;
    let latest_products = summarize(&state.orm, latest, session).await?;

    let data = Home {
        categories,
        latest_products,
        cart_count: session.cart.count(),
        favorites_count: session.favorites.len(),
        currency: session.currency,
    };
    Ok(ApiResponse::success("Storefront", data, Some(Meta::empty())))
}

pub async fn list_products(
    state: &AppState,
    session: &SessionData,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.query.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(ProdCol::Name))).like(contains_pattern(search)))
                .add(
                    Expr::expr(Func::lower(Expr::col(ProdCol::Description)))
                        .like(contains_pattern(search)),
                ),
        );
    }

    if let Some(category_id) = query.category_id {
        condition = condition.add(ProdCol::CategoryId.eq(category_id));
    }

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(ProdCol::CreatedAt)
        .order_by_asc(ProdCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let products = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = summarize(&state.orm, products, session).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(
    state: &AppState,
    session: &SessionData,
    id: Uuid,
) -> AppResult<ApiResponse<ProductDetail>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let category = match product.category_id {
        Some(category_id) => Categories::find_by_id(category_id)
            .one(&state.orm)
            .await?
            .map(Category::from),
        None => None,
    };

    let reviews = Reviews::find()
        .filter(ReviewCol::ProductId.eq(id))
        .order_by_desc(ReviewCol::DatePosted)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();

    let mut summaries = summarize(&state.orm, vec![product], session).await?;
    let product = summaries.pop().ok_or(AppError::NotFound)?;

    let data = ProductDetail {
        product,
        category,
        reviews,
    };
    Ok(ApiResponse::success("Product", data, None))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let counts: HashMap<Uuid, i64> = Products::find()
        .select_only()
        .column(ProdCol::CategoryId)
        .column_as(Expr::col(ProdCol::Id).count(), "product_count")
        .filter(ProdCol::CategoryId.is_not_null())
        .group_by(ProdCol::CategoryId)
        .into_tuple::<(Option<Uuid>, i64)>()
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(category_id, count)| category_id.map(|id| (id, count)))
        .collect();

    let items = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| CategoryWithCount {
            product_count: counts.get(&model.id).copied().unwrap_or(0),
            category: Category::from(model),
        })
        .collect();

    Ok(ApiResponse::success("Categories", CategoryList { items }, None))
}

pub fn currency_settings(selected: Currency) -> CurrencySettings {
    CurrencySettings {
        selected,
        available: Currency::ALL
            .into_iter()
            .map(|code| CurrencyRate {
                code,
                rate: code.rate().to_string(),
            })
            .collect(),
    }
}

/// Rating average and count per product, read in one query.
pub async fn rating_summaries<C>(conn: &C, product_ids: &[Uuid]) -> AppResult<HashMap<Uuid, RatingSummary>>
where
    C: ConnectionTrait,
{
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut ratings: HashMap<Uuid, Vec<i32>> = HashMap::new();
    let rows = Reviews::find()
        .select_only()
        .column(ReviewCol::ProductId)
        .column(ReviewCol::Rating)
        .filter(ReviewCol::ProductId.is_in(product_ids.iter().copied()))
        .into_tuple::<(Uuid, i32)>()
        .all(conn)
        .await?;
    for (product_id, rating) in rows {
        ratings.entry(product_id).or_default().push(rating);
    }

    Ok(product_ids
        .iter()
        .map(|id| {
            let summary = RatingSummary::from_ratings(ratings.get(id).map(Vec::as_slice).unwrap_or(&[]));
            (*id, summary)
        })
        .collect())
}

pub(crate) async fn summarize<C>(
    conn: &C,
    products: Vec<ProductModel>,
    session: &SessionData,
) -> AppResult<Vec<ProductSummary>>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let ratings = rating_summaries(conn, &ids).await?;

    Ok(products
        .into_iter()
        .map(|model| {
            let product = Product::from(model);
            ProductSummary {
                display_price: session.currency.format(product.price),
                rating: ratings
                    .get(&product.id)
                    .copied()
                    .unwrap_or_else(|| RatingSummary::from_ratings(&[])),
                is_favorite: session.favorites.contains(product.id),
                product,
            }
        })
        .collect())
}
