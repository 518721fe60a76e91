use crate::{
    challenges::commands::{CommandError, ErrorKind},
    db::{models::Favorite, repositories::remedies::validate_input, DayPlan, Remedy, RemedyInput},
    AppState,
};

pub async fn create_remedy(state: &AppState, input: RemedyInput) -> Result<Remedy, CommandError> {
    validate_input(&input)
        .map_err(|err| CommandError::new(ErrorKind::InvalidInput, err.to_string()))?;
    Ok(state.db.create_remedy(input).await?)
}

pub async fn get_remedies(state: &AppState) -> Result<Vec<Remedy>, CommandError> {
    Ok(state.db.list_remedies().await?)
}

pub async fn get_remedies_by_category(
    state: &AppState,
    category: String,
) -> Result<Vec<Remedy>, CommandError> {
    Ok(state.db.list_remedies_by_category(&category).await?)
}

pub async fn get_remedy(
    state: &AppState,
    remedy_id: String,
) -> Result<Option<Remedy>, CommandError> {
    Ok(state.db.get_remedy(&remedy_id).await?)
}

/// Task list for one day of a remedy; `None` if the remedy or day is unknown.
pub async fn get_day_plan(
    state: &AppState,
    remedy_id: String,
    day: u32,
) -> Result<Option<DayPlan>, CommandError> {
    if day == 0 {
        return Err(CommandError::new(
            ErrorKind::InvalidInput,
            "day numbers start at 1",
        ));
    }
    let remedy = state.db.get_remedy(&remedy_id).await?;
    Ok(remedy.and_then(|remedy| remedy.day_plan(day).cloned()))
}

pub async fn add_to_favorites(
    state: &AppState,
    user_id: String,
    remedy_id: String,
) -> Result<Favorite, CommandError> {
    Ok(state.db.add_favorite(&user_id, &remedy_id).await?)
}

pub async fn remove_from_favorites(
    state: &AppState,
    user_id: String,
    remedy_id: String,
) -> Result<(), CommandError> {
    Ok(state.db.remove_favorite(&user_id, &remedy_id).await?)
}

pub async fn is_favorite(
    state: &AppState,
    user_id: String,
    remedy_id: String,
) -> Result<bool, CommandError> {
    Ok(state.db.is_favorite(&user_id, &remedy_id).await?)
}

pub async fn get_user_favorites(
    state: &AppState,
    user_id: String,
) -> Result<Vec<Remedy>, CommandError> {
    Ok(state.db.list_favorites(&user_id).await?)
}
