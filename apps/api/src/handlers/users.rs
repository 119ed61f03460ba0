use axum::{Extension, Json};
use warden_core::AuthenticatedUser;

use crate::dto::CurrentUserResponse;

pub async fn me_handler(
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse::from(user))
}
