// handlers/scoped/categories.rs - POST /add-category and /delete-category handlers

use axum::{
    extract::{Extension, State},
    response::Response,
    Form,
};

use crate::context::AppContext;
use crate::error::ApiError;
use crate::middleware::{found, ScopedTenant};

use super::forms::{AddCategoryForm, DeleteCategoryForm};

/// POST /add-category - Create a ticket category in the selected guild
pub async fn add_category_post(
    State(ctx): State<AppContext>,
    Extension(scope): Extension<ScopedTenant>,
    Form(form): Form<AddCategoryForm>,
) -> Result<Response, ApiError> {
    let category = ctx
        .store
        .create_category(&scope.tenant_id, form.name()?, form.description())
        .await?;

    tracing::info!(guild_id = %scope.tenant_id, category_id = category.id, "category created");
    Ok(found("/dashboard"))
}

/// POST /delete-category - Delete a category of the selected guild
///
/// A blank id does nothing. Ids belonging to another guild are left alone.
pub async fn delete_category_post(
    State(ctx): State<AppContext>,
    Extension(scope): Extension<ScopedTenant>,
    Form(form): Form<DeleteCategoryForm>,
) -> Result<Response, ApiError> {
    if let Some(category_id) = form.category_id()? {
        let deleted = ctx.store.delete_category(&scope.tenant_id, category_id).await?;
        if deleted {
            tracing::info!(guild_id = %scope.tenant_id, category_id, "category deleted");
        } else {
            tracing::debug!(guild_id = %scope.tenant_id, category_id, "no such category in guild");
        }
    }

    Ok(found("/dashboard"))
}
