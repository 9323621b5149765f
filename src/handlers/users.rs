use crate::accounts::update::update_user;
use crate::auth::middleware::Identity;
use crate::core::error::AccountError;
use crate::core::state::AppState;
use crate::models::api::UpdateUserRequest;
use crate::models::user::UserView;
use crate::policy::{authorize_listing, authorize_view};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

/// List the users the caller may see
///
/// GET /users
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
) -> Result<Json<Vec<UserView>>, AccountError> {
    let filter = authorize_listing(&caller)?;

    let snapshot = state.users.list_all()?;
    let visible: Vec<UserView> = filter
        .apply(snapshot)
        .into_iter()
        .map(UserView::from)
        .collect();

    debug!(caller_id = %caller.id, count = visible.len(), "Users listed");

    Ok(Json(visible))
}

/// GET /users/{id}
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Path(id): Path<String>,
) -> Result<Json<UserView>, AccountError> {
    // Roles without listing rights learn nothing about which ids exist
    authorize_listing(&caller)?;

    let target = state.users.get_by_id(&id)?;
    authorize_view(&caller, &target)?;

    Ok(Json(UserView::from(target)))
}

/// PUT /users/{id}
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Identity(caller): Identity,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserView>, AccountError> {
    let Json(changes) = payload.map_err(|r| AccountError::BadRequest(r.body_text()))?;

    let updated = update_user(&state.users, &caller, &id, &changes)?;

    Ok(Json(UserView::from(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{create_test_state, TestApp};
    use crate::models::user::{Role, Status, User};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    struct School {
        app: TestApp,
        owner: User,
        admin: User,
        helper: User,
        tutor: User,
        learner: User,
        gone: User,
        southern: User,
    }

    fn school() -> School {
        let app = create_test_state();
        let owner = app.seed("owner", Role::Owner, "hq");
        let admin = app.seed("admin", Role::Admin, "north");
        let helper = app.seed("helper", Role::Helper, "north");
        let tutor = app.seed("tutor", Role::Tutor, "north");
        let learner = app.seed("learner", Role::User, "north");
        let gone = app.seed("gone", Role::User, "north");
        app.set_status(&gone.id, Status::Deleted);
        let southern = app.seed("southern", Role::User, "south");

        School {
            app,
            owner,
            admin,
            helper,
            tutor,
            learner,
            gone,
            southern,
        }
    }

    async fn list_as(s: &School, caller: &User) -> Result<Vec<String>, AccountError> {
        let Json(views) =
            list_users_handler(State(s.app.state.clone()), Identity(caller.clone())).await?;
        Ok(views.into_iter().map(|v| v.login).collect())
    }

    #[tokio::test]
    async fn test_owner_lists_everyone() {
        let s = school();
        let logins = list_as(&s, &s.owner).await.unwrap();

        assert_eq!(logins.len(), 7);
        assert!(logins.contains(&"gone".to_string()));
    }

    #[tokio::test]
    async fn test_admin_lists_own_filial_without_deleted() {
        let s = school();
        let logins = list_as(&s, &s.admin).await.unwrap();

        assert_eq!(logins, vec!["admin", "helper", "tutor", "learner"]);
    }

    #[tokio::test]
    async fn test_helper_lists_only_learners() {
        let s = school();
        assert_eq!(list_as(&s, &s.helper).await.unwrap(), vec!["learner"]);
    }

    #[tokio::test]
    async fn test_tutor_cannot_list() {
        let s = school();
        let err = list_as(&s, &s.tutor).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_get_user_visibility() {
        let s = school();
        let state = s.app.state.clone();

        let Json(view) = get_user_handler(
            State(state.clone()),
            Identity(s.admin.clone()),
            Path(s.learner.id.clone()),
        )
        .await
        .unwrap();
        assert_eq!(view.login, "learner");

        for hidden in [&s.southern, &s.gone] {
            let err = get_user_handler(
                State(state.clone()),
                Identity(s.admin.clone()),
                Path(hidden.id.clone()),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AccountError::Forbidden(_)));
        }

        let err = get_user_handler(
            State(state.clone()),
            Identity(s.admin.clone()),
            Path("missing".to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(err, AccountError::NotFound);

        let err = get_user_handler(State(state), Identity(s.tutor.clone()), Path("missing".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_login() {
        let s = school();

        let Json(view) = update_user_handler(
            State(s.app.state.clone()),
            Identity(s.admin.clone()),
            Path(s.learner.id.clone()),
            Ok(Json(UpdateUserRequest {
                name: Some(" Renamed ".to_string()),
                role: Some("tutor".to_string()),
                ..Default::default()
            })),
        )
        .await
        .unwrap();

        assert_eq!(view.id, s.learner.id);
        assert_eq!(view.login, "learner");
        assert_eq!(view.name, "Renamed");
        assert_eq!(view.role, Role::Tutor);
    }

    #[tokio::test]
    async fn test_update_denials() {
        let s = school();
        let state = s.app.state.clone();

        let promote = UpdateUserRequest {
            role: Some("admin".to_string()),
            ..Default::default()
        };
        let err = update_user_handler(
            State(state.clone()),
            Identity(s.admin.clone()),
            Path(s.helper.id.clone()),
            Ok(Json(promote)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccountError::Forbidden(_)));

        let relocate = UpdateUserRequest {
            filial: Some("south".to_string()),
            ..Default::default()
        };
        let err = update_user_handler(
            State(state.clone()),
            Identity(s.admin.clone()),
            Path(s.learner.id.clone()),
            Ok(Json(relocate)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccountError::Forbidden(_)));

        let short = UpdateUserRequest {
            password: Some("123".to_string()),
            ..Default::default()
        };
        let err = update_user_handler(
            State(state),
            Identity(s.owner.clone()),
            Path(s.learner.id.clone()),
            Ok(Json(short)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AccountError::BadRequest(_)));
    }
}
