use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::record_activity,
    dto::{
        products::{AdminProductList, CategoryRequest, ProductEditor, ProductForm},
        storefront::Deleted,
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{Authorized, ManageProducts},
    models::{Category, Product},
    response::{ApiResponse, Meta},
    routes::params::LowStockQuery,
    services::upload_service::{MAX_PRICE, remove_image, store_image},
    state::AppState,
};

/// Products with stock strictly below this count as low on stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

pub async fn create_product(
    state: &AppState,
    admin: &Authorized<ManageProducts>,
    form: ProductForm,
) -> AppResult<ApiResponse<Product>> {
    let (Some(name), Some(price)) = (form.name.clone(), form.price) else {
        return Err(AppError::BadRequest("name and price are required".into()));
    };
    check_price(price)?;
    if let Some(category_id) = form.category_id {
        ensure_category(&state.orm, category_id).await?;
    }

    let image_url = match &form.image {
        Some(upload) => Some(store_image(&state.config, upload).await?),
        None => form.image_url.clone(),
    };

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        price: Set(price),
        description: Set(form.description),
        stock: Set(form.stock.unwrap_or(0)),
        image_url: Set(image_url),
        category_id: Set(form.category_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Added product '{}' ({})", product.name, product.id),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Product {} added", product.name),
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn edit_form(
    state: &AppState,
    _admin: &Authorized<ManageProducts>,
    id: Uuid,
) -> AppResult<ApiResponse<ProductEditor>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let categories = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    Ok(ApiResponse::success(
        "Product",
        ProductEditor {
            product: Product::from(product),
            categories,
        },
        Some(Meta::empty()),
    ))
}

/// Applies the fields present in `form`; absent fields keep their value.
pub async fn update_product(
    state: &AppState,
    admin: &Authorized<ManageProducts>,
    id: Uuid,
    form: ProductForm,
) -> AppResult<ApiResponse<Product>> {
    let new_image = match &form.image {
        Some(upload) => Some(store_image(&state.config, upload).await?),
        None => None,
    };

    let txn = state.orm.begin().await?;
    let updated = match apply_product_form(&txn, id, form, new_image.clone()).await {
        Ok(updated) => {
            txn.commit().await?;
            updated
        }
        Err(err) => {
            txn.rollback().await?;
            if let Some(url) = &new_image {
                remove_image(&state.config, url).await;
            }
            return Err(err);
        }
    };
    let (product, replaced_image) = updated;

    if let Some(old) = replaced_image {
        remove_image(&state.config, &old).await;
    }

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Edited product '{}' ({})", product.name, product.id),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Product {} updated", product.name),
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// Returns the updated row and the image URL it no longer points at, if any.
async fn apply_product_form(
    txn: &DatabaseTransaction,
    id: Uuid,
    form: ProductForm,
    new_image: Option<String>,
) -> AppResult<(ProductModel, Option<String>)> {
    let product = Products::find_by_id(id)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous_image = product.image_url.clone();

    if let Some(category_id) = form.category_id {
        ensure_category(txn, category_id).await?;
    }

    let mut active: ProductActive = product.into();
    if let Some(name) = form.name {
        active.name = Set(name);
    }
    if let Some(price) = form.price {
        check_price(price)?;
        active.price = Set(price);
    }
    if let Some(description) = form.description {
        active.description = Set(Some(description));
    }
    if let Some(stock) = form.stock {
        active.stock = Set(stock);
    }
    if let Some(category_id) = form.category_id {
        active.category_id = Set(Some(category_id));
    }
    let image_url = new_image.or(form.image_url);
    let image_changed = image_url.is_some() && image_url != previous_image;
    if let Some(url) = image_url {
        active.image_url = Set(Some(url));
    }

    let product = active.update(txn).await?;
    let replaced = if image_changed { previous_image } else { None };
    Ok((product, replaced))
}

fn check_price(price: i64) -> AppResult<()> {
    if !(0..=MAX_PRICE).contains(&price) {
        return Err(AppError::BadRequest(format!(
            "price must be between 0 and {MAX_PRICE} minor units"
        )));
    }
    Ok(())
}

pub async fn delete_product(
    state: &AppState,
    admin: &Authorized<ManageProducts>,
    id: Uuid,
) -> AppResult<ApiResponse<Deleted>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Products::delete_by_id(product.id).exec(&state.orm).await?;

    if let Some(url) = &product.image_url {
        remove_image(&state.config, url).await;
    }

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Deleted product '{}' ({})", product.name, product.id),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Product {} deleted", product.name),
        Deleted { id },
        Some(Meta::empty()),
    ))
}

pub async fn low_stock(
    state: &AppState,
    _admin: &Authorized<ManageProducts>,
    query: LowStockQuery,
) -> AppResult<ApiResponse<AdminProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let threshold = query.threshold.unwrap_or(LOW_STOCK_THRESHOLD);

    let finder = Products::find()
        .filter(ProdCol::Stock.lt(threshold))
        .order_by_asc(ProdCol::Stock)
        .order_by_asc(ProdCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Low stock products",
        AdminProductList { items },
        Some(meta),
    ))
}

pub async fn create_category(
    state: &AppState,
    admin: &Authorized<ManageProducts>,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    payload.validate()?;
    let name = payload.name.trim().to_owned();
    if name.is_empty() {
        return Err(AppError::BadRequest("category name is required".into()));
    }
    ensure_category_name_free(state, &name, None).await?;

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Added category '{}'", category.name),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Category {} added", category.name),
        Category::from(category),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    admin: &Authorized<ManageProducts>,
    id: Uuid,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    payload.validate()?;
    let name = payload.name.trim().to_owned();
    if name.is_empty() {
        return Err(AppError::BadRequest("category name is required".into()));
    }

    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_category_name_free(state, &name, Some(id)).await?;
    let previous = category.name.clone();

    let mut active: CategoryActive = category.into();
    active.name = Set(name);
    let category = active.update(&state.orm).await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Renamed category '{previous}' to '{}'", category.name),
    )
    .await;

    Ok(ApiResponse::success(
        "Category updated",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

/// Refuses with 409 while any product still references the category.
pub async fn delete_category(
    state: &AppState,
    admin: &Authorized<ManageProducts>,
    id: Uuid,
) -> AppResult<ApiResponse<Deleted>> {
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let in_use = Products::find()
        .filter(ProdCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "category '{}' still has {in_use} product(s)",
            category.name
        )));
    }

    Categories::delete_by_id(id).exec(&state.orm).await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Deleted category '{}'", category.name),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Category {} deleted", category.name),
        Deleted { id },
        Some(Meta::empty()),
    ))
}

async fn ensure_category<C>(conn: &C, id: Uuid) -> AppResult<()>
where
    C: ConnectionTrait,
{
    match Categories::find_by_id(id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(AppError::BadRequest(format!("category {id} does not exist"))),
    }
}

async fn ensure_category_name_free(
    state: &AppState,
    name: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let existing = Categories::find()
        .filter(CategoryCol::Name.eq(name))
        .one(&state.orm)
        .await?;
    match existing {
        Some(other) if Some(other.id) != except => Err(AppError::BadRequest(format!(
            "category '{name}' already exists"
        ))),
        _ => Ok(()),
    }
}
