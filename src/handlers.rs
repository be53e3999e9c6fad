//! HTTP handlers and router assembly.

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Extension, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;
use maud::Markup;
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, StoreError};
use crate::pages::{self, UploadFlash};
use crate::session::{self, CurrentUser, SESSION_COOKIE};
use crate::state::AppState;
use crate::store::SaveRequest;
use crate::naming;

/// Builds the application router: public login routes merged with the
/// session-guarded photo routes.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(home))
        .route("/upload", get(upload_form).post(upload_photos))
        .route("/photos", get(gallery))
        .route("/photos/:filename", get(serve_photo))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_login,
        ));

    let public = Router::new().route("/login", get(login_form).post(login_action));

    Router::new().merge(protected).merge(public).with_state(state)
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    name: String,
    password: String,
}

async fn login_form() -> Markup {
    pages::login(None)
}

async fn login_action(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if !state.credentials.check(&form.name, &form.password) {
        tracing::warn!(user = %form.name, "invalid login attempt");
        return pages::login(Some("Invalid username or password")).into_response();
    }

    tracing::info!(user = %form.name, "user logged in");
    let cookie = Cookie::build((SESSION_COOKIE, form.name))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), Redirect::to("/")).into_response()
}

async fn home(State(state): State<AppState>) -> Markup {
    pages::home(&state.config.site_name)
}

async fn upload_form() -> Markup {
    pages::upload(None)
}

/// Runs the upload pipeline for each file in the multipart batch.
///
/// Files are processed independently; the response only reports the
/// aggregate outcome, with per-file rejections visible in the logs.
async fn upload_photos(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    while let Some(field) = multipart.next_field().await? {
        let Some(original_name) = field.file_name().map(ToOwned::to_owned) else {
            // Non-file parts carry no photo.
            continue;
        };
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field.bytes().await?;

        let request = SaveRequest {
            original_name,
            content_type,
            uploaded_by: user.clone(),
            bytes,
        };

        match state.store.save(request).await {
            Ok(stored) => {
                tracing::info!(file = %stored.file_name, user = %user, "upload accepted");
                accepted += 1;
            }
            Err(err @ StoreError::UnsupportedType { .. }) => {
                tracing::warn!(user = %user, error = %err, "upload rejected");
                rejected += 1;
            }
            Err(err) => {
                tracing::error!(user = %user, error = %err, "upload failed");
                rejected += 1;
            }
        }
    }

    if accepted == 0 {
        return Ok(pages::upload(Some(&UploadFlash::Rejected {
            message: "No valid images were uploaded.".to_owned(),
        })));
    }

    tracing::info!(accepted, rejected, user = %user, "upload batch finished");
    Ok(pages::upload(Some(&UploadFlash::Uploaded { accepted })))
}

async fn gallery(State(state): State<AppState>) -> Markup {
    pages::gallery(&state.store.photo_names())
}

/// Streams a stored photo. Names outside the manifest are a plain 404, so
/// the manifest doubles as the path allowlist.
async fn serve_photo(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if !state.store.contains(&filename) {
        tracing::warn!(user = %user, file = %filename, "requested unknown photo");
        return Ok((StatusCode::NOT_FOUND, "File not found.").into_response());
    }

    let file = tokio::fs::File::open(state.store.photo_path(&filename)).await?;
    let length = file.metadata().await?.len();
    let body = Body::from_stream(ReaderStream::new(file));

    let response = Response::builder()
        .header(header::CONTENT_TYPE, naming::content_type_for(&filename))
        .header(header::CONTENT_LENGTH, length)
        .body(body)?;
    Ok(response)
}
