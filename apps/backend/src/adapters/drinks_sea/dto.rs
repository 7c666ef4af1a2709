//! DTOs for the drinks adapter.

/// DTO for inserting a drink row.
#[derive(Debug, Clone)]
pub struct DrinkCreate {
    pub title: String,
    /// Recipe already serialized as JSON text
    pub recipe: String,
}

/// DTO for a partial drink update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DrinkUpdate {
    pub title: Option<String>,
    pub recipe: Option<String>,
}

impl DrinkUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}
