//! Drink repository: domain model, representations and persistence calls.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

use crate::adapters::drinks_sea::{self as adapter, DrinkCreate, DrinkUpdate};
use crate::entities::drinks;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// One recipe ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Public view of an ingredient: the name is hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

/// Drink domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// `short` representation served by the public listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

/// `long` representation served to authorized callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| IngredientShort {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

impl TryFrom<drinks::Model> for Drink {
    type Error = DomainError;

    fn try_from(model: drinks::Model) -> Result<Self, Self::Error> {
        let recipe = serde_json::from_str(&model.recipe).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("invalid recipe stored for drink_id={}: {e}", model.id),
            )
        })?;
        Ok(Self {
            id: model.id,
            title: model.title,
            recipe,
        })
    }
}

/// Input for creating a drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("Drink title cannot be empty"));
    }
    Ok(())
}

fn encode_recipe(recipe: &[Ingredient]) -> Result<String, DomainError> {
    serde_json::to_string(recipe).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("Serialize".into()),
            format!("failed to serialize recipe: {e}"),
        )
    })
}

pub async fn list_drinks<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Drink>, DomainError> {
    adapter::find_all(conn)
        .await?
        .into_iter()
        .map(Drink::try_from)
        .collect()
}

pub async fn find_drink<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i32,
) -> Result<Option<Drink>, DomainError> {
    adapter::find_by_id(conn, id)
        .await?
        .map(Drink::try_from)
        .transpose()
}

pub async fn create_drink<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewDrink,
) -> Result<Drink, DomainError> {
    validate_title(&new.title)?;
    let dto = DrinkCreate {
        recipe: encode_recipe(&new.recipe)?,
        title: new.title,
    };
    let model = adapter::create_drink(conn, dto).await?;
    Drink::try_from(model)
}

pub async fn update_drink<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i32,
    patch: DrinkPatch,
) -> Result<Drink, DomainError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    let dto = DrinkUpdate {
        recipe: patch.recipe.as_deref().map(encode_recipe).transpose()?,
        title: patch.title,
    };

    let model = adapter::update_drink(conn, id, dto)
        .await?
        .ok_or_else(|| DomainError::drink_not_found(id))?;
    Drink::try_from(model)
}

pub async fn delete_drink<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i32,
) -> Result<(), DomainError> {
    match adapter::delete_drink(conn, id).await? {
        0 => Err(DomainError::drink_not_found(id)),
        _ => Ok(()),
    }
}
