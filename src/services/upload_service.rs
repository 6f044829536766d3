//! Product form parsing and image storage.
//!
//! Images are written under `<static_dir>/uploads/` with a random name and
//! served back from `/static/uploads/`.

use std::{path::Path, str::FromStr};

use axum::extract::Multipart;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::products::{ImageUpload, ProductForm},
    error::{AppError, AppResult},
};

/// Highest accepted price in minor units (1,000,000.00).
pub const MAX_PRICE: i64 = 100_000_000;

/// Maximum accepted image size (5MB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

const PUBLIC_PREFIX: &str = "/static/uploads/";

pub async fn read_product_form(mut multipart: Multipart) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart request: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let file_name = field.file_name().map(str::to_owned).unwrap_or_default();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("multipart error: {e}")))?;
            // Browsers send an empty part when no file was picked.
            if !file_name.is_empty() && !bytes.is_empty() {
                form.image = Some(ImageUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("multipart error: {e}")))?;
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match name.as_str() {
            "name" => form.name = Some(value.to_owned()),
            "price" => form.price = Some(parse_price(value)?),
            "description" => form.description = Some(value.to_owned()),
            "stock" => form.stock = Some(parse_stock(value)?),
            "category_id" => {
                let id = Uuid::parse_str(value)
                    .map_err(|_| AppError::BadRequest("category_id must be a UUID".into()))?;
                form.category_id = Some(id);
            }
            "image_url" => form.image_url = Some(value.to_owned()),
            other => tracing::debug!(field = other, "ignoring unknown product form field"),
        }
    }

    Ok(form)
}

/// Parses a decimal price such as `"12.5"` into minor units (`1250`).
pub fn parse_price(raw: &str) -> AppResult<i64> {
    let price = Decimal::from_str(raw.trim())
        .map_err(|_| AppError::BadRequest("price must be a number".into()))?;
    if price.is_sign_negative() {
        return Err(AppError::BadRequest("price cannot be negative".into()));
    }
    (price.round_dp(2) * Decimal::ONE_HUNDRED)
        .to_i64()
        .filter(|minor| *minor <= MAX_PRICE)
        .ok_or_else(|| AppError::BadRequest("price is out of range".into()))
}

pub fn parse_stock(raw: &str) -> AppResult<i32> {
    let stock = raw
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("stock must be a whole number".into()))?;
    if stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }
    Ok(stock)
}

/// Validates and stores an uploaded image, returning its public URL.
pub async fn store_image(config: &AppConfig, upload: &ImageUpload) -> AppResult<String> {
    let ext = validate_image(upload)?;

    let dir = config.upload_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to create upload dir: {e}")))?;

    let file_name = format!("{}.{ext}", Uuid::new_v4());
    tokio::fs::write(dir.join(&file_name), &upload.bytes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to write image: {e}")))?;

    tracing::info!(file = %file_name, size = upload.bytes.len(), "product image stored");
    Ok(format!("{PUBLIC_PREFIX}{file_name}"))
}

/// Removes a previously uploaded image. URLs not pointing into the upload
/// directory are left alone.
pub async fn remove_image(config: &AppConfig, image_url: &str) {
    let Some(file_name) = image_url.strip_prefix(PUBLIC_PREFIX) else {
        return;
    };
    if file_name.contains('/') || file_name.contains("..") {
        return;
    }
    if let Err(err) = tokio::fs::remove_file(config.upload_dir().join(file_name)).await {
        tracing::warn!(error = %err, image_url, "failed to remove product image");
    }
}

fn validate_image(upload: &ImageUpload) -> AppResult<String> {
    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(format!(
            "image too large, maximum is {}MB",
            MAX_IMAGE_BYTES / 1024 / 1024
        )));
    }

    let ext = Path::new(&upload.file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| AppError::BadRequest(format!("invalid file name: {}", upload.file_name)))?;

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "unsupported image format '{ext}', supported: {}",
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    let mime = mime_guess::from_ext(&ext).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(AppError::BadRequest(format!("'{ext}' is not an image type")));
    }

    Ok(ext)
}
