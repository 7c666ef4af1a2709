use actix_web::{guard, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::claims::{Permission, VerifiedClaims};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::middleware::require_permission::RequirePermission;
use crate::repos::drinks::{self, DrinkLong, DrinkPatch, DrinkShort, Ingredient, NewDrink};
use crate::state::app_state::AppState;

/// A recipe may be sent as a list of ingredients or as one ingredient object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl From<RecipeInput> for Vec<Ingredient> {
    fn from(value: RecipeInput) -> Self {
        match value {
            RecipeInput::Many(list) => list,
            RecipeInput::One(one) => vec![one],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    fn ok(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i32,
}

fn subject(claims: &VerifiedClaims) -> &str {
    claims.sub.as_deref().unwrap_or("-")
}

/// GET /drinks: public listing with the short representation.
async fn list_drinks(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let drinks = drinks::list_drinks(db).await?;
    let body: Vec<DrinkShort> = drinks.iter().map(|d| d.short()).collect();
    Ok(HttpResponse::Ok().json(DrinksResponse::ok(body)))
}

/// GET /drinks-detail: full recipes, `get:drinks-detail`.
async fn list_drinks_detail(
    _claims: VerifiedClaims,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let drinks = drinks::list_drinks(db).await?;
    let body: Vec<DrinkLong> = drinks.iter().map(|d| d.long()).collect();
    Ok(HttpResponse::Ok().json(DrinksResponse::ok(body)))
}

/// POST /drinks, `post:drinks`.
async fn create_drink(
    claims: VerifiedClaims,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateDrinkRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    let new = NewDrink {
        title: request.title,
        recipe: request.recipe.into(),
    };

    let drink = with_txn(&app_state, move |txn| {
        Box::pin(async move { drinks::create_drink(txn, new).await.map_err(AppError::from) })
    })
    .await?;

    info!(sub = subject(&claims), drink_id = drink.id, "drink.created");
    Ok(HttpResponse::Ok().json(DrinksResponse::ok(vec![drink.long()])))
}

/// PATCH /drinks/{id}, `patch:drinks`. Only supplied fields change.
async fn update_drink(
    claims: VerifiedClaims,
    path: web::Path<i32>,
    app_state: web::Data<AppState>,
    body: ValidatedJson<UpdateDrinkRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let request = body.into_inner();
    let patch = DrinkPatch {
        title: request.title,
        recipe: request.recipe.map(Into::into),
    };

    let drink = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            drinks::update_drink(txn, id, patch)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    info!(sub = subject(&claims), drink_id = id, "drink.updated");
    Ok(HttpResponse::Ok().json(DrinksResponse::ok(vec![drink.long()])))
}

/// DELETE /drinks/{id}, `delete:drinks`.
async fn delete_drink(
    claims: VerifiedClaims,
    path: web::Path<i32>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    with_txn(&app_state, move |txn| {
        Box::pin(async move { drinks::delete_drink(txn, id).await.map_err(AppError::from) })
    })
    .await?;

    info!(sub = subject(&claims), drink_id = id, "drink.deleted");
    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        delete: id,
    }))
}

async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}

/// Each path is registered once per supported method so that every
/// permission guard wraps exactly one handler; the trailing unguarded
/// resource answers any other method with 405.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::not_found("Resource Not Found").into()),
    );

    cfg.service(
        web::resource("/drinks")
            .guard(guard::Get())
            .to(list_drinks),
    )
    .service(
        web::resource("/drinks")
            .guard(guard::Post())
            .wrap(RequirePermission::new(Permission::PostDrinks))
            .to(create_drink),
    )
    .service(web::resource("/drinks").to(method_not_allowed));

    cfg.service(
        web::resource("/drinks-detail")
            .guard(guard::Get())
            .wrap(RequirePermission::new(Permission::GetDrinksDetail))
            .to(list_drinks_detail),
    )
    .service(web::resource("/drinks-detail").to(method_not_allowed));

    cfg.service(
        web::resource("/drinks/{id:\\d+}")
            .guard(guard::Patch())
            .wrap(RequirePermission::new(Permission::PatchDrinks))
            .to(update_drink),
    )
    .service(
        web::resource("/drinks/{id:\\d+}")
            .guard(guard::Delete())
            .wrap(RequirePermission::new(Permission::DeleteDrinks))
            .to(delete_drink),
    )
    .service(web::resource("/drinks/{id:\\d+}").to(method_not_allowed));
}
