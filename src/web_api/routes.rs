//! API Routes

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::classifier::{Prediction, TOP_K};
use crate::error::{Error, Result};
use crate::issue_service::{CreateIssueRequest, ReplyIssueRequest};
use crate::models::ApiResponse;
use crate::notice_service::{CreateNoticeRequest, UpdateNoticeRequest};
use crate::recycle_service::{CreateRecycledItemRequest, UpdateRecycledItemRequest};
use crate::state::AppState;
use crate::user_service::{LoginRequest, RegisterRequest};

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route("/healthz", get(super::health_check))
        .route("/test_mysql_connection", get(super::db_check))
        // Auth
        .route("/login", post(login))
        .route("/register", post(register))
        // Notices
        .route("/notifications", get(list_notices))
        .route("/notifications/add", post(add_notice))
        .route("/notifications/edit/:id", post(edit_notice))
        .route("/notifications/delete/:id", post(delete_notice))
        .route("/govNotice", get(recent_notices))
        .route("/noticeAll", get(recent_notices))
        .route("/view_notice/:id", get(view_notice))
        // Issues
        .route("/issues", get(list_issues))
        .route("/govHelp/add_issues", post(add_issue))
        .route("/reply_issues/:id", post(reply_issue))
        .route("/issues/delete/:id", post(delete_issue))
        .route("/ViewIssuesReplyAll", get(replied_issues))
        .route("/ViewReply/:id", get(view_reply))
        // Recycled items
        .route("/recycled-items", get(list_recycled_items))
        .route("/recycled-items/add", post(add_recycled_item))
        .route("/edit_recycled_item/:id", post(edit_recycled_item))
        .route("/delete_recycled_item/:id", post(delete_recycled_item))
        .route("/productRecycle", get(product_recycle))
        .route("/view_goods/:id", get(view_goods))
        // Classification
        .route("/classify", post(classify_upload))
        .with_state(state)
}

// ========================================
// Auth Handlers
// ========================================

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    match state.users.verify_login(&req).await {
        Ok(ok) => {
            if ok {
                tracing::info!(username = %req.username, "Login succeeded");
            } else {
                tracing::info!(username = %req.username, "Login rejected");
            }
            Json(json!({"success": ok})).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    match state.users.register(req).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "User registered");
            Json(json!({"success": true})).into_response()
        }
        // Duplicate username keeps the original boolean contract
        Err(Error::Conflict(_)) => Json(json!({"success": false})).into_response(),
        Err(e) => e.into_response(),
    }
}

// ========================================
// Notice Handlers
// ========================================

async fn list_notices(State(state): State<AppState>) -> impl IntoResponse {
    match state.notices.list().await {
        Ok(notices) => Json(ApiResponse::success(notices)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn recent_notices(State(state): State<AppState>) -> impl IntoResponse {
    match state.notices.list_recent().await {
        Ok(notices) => Json(ApiResponse::success(notices)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn view_notice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.notices.get(id).await {
        Ok(notice) => Json(ApiResponse::success(notice)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn add_notice(
    State(state): State<AppState>,
    Json(req): Json<CreateNoticeRequest>,
) -> impl IntoResponse {
    match state.notices.create(req).await {
        Ok(_) => Json(json!({"success": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn edit_notice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateNoticeRequest>,
) -> impl IntoResponse {
    match state.notices.update(id, req).await {
        Ok(_) => Json(json!({"success": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.notices.delete(id).await {
        Ok(_) => Json(json!({"success": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

// ========================================
// Issue Handlers
// ========================================

async fn list_issues(State(state): State<AppState>) -> impl IntoResponse {
    match state.issues.list().await {
        Ok(issues) => Json(ApiResponse::success(issues)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn replied_issues(State(state): State<AppState>) -> impl IntoResponse {
    match state.issues.list_replied().await {
        Ok(issues) => Json(ApiResponse::success(issues)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn view_reply(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match state.issues.get(id).await {
        Ok(issue) => Json(ApiResponse::success(issue)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn add_issue(
    State(state): State<AppState>,
    Json(req): Json<CreateIssueRequest>,
) -> impl IntoResponse {
    match state.issues.create(req).await {
        Ok(_) => Json(json!({"success": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn reply_issue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<ReplyIssueRequest>,
) -> impl IntoResponse {
    match state.issues.reply(id, req).await {
        Ok(_) => Json(json!({"success": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_issue(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.issues.delete(id).await {
        Ok(_) => Json(json!({"success": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

// ========================================
// Recycled Item Handlers
// ========================================

async fn list_recycled_items(State(state): State<AppState>) -> impl IntoResponse {
    match state.recycled.list().await {
        Ok(items) => Json(ApiResponse::success(items)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn product_recycle(State(state): State<AppState>) -> impl IntoResponse {
    match state.recycled.list_putaway().await {
        Ok(items) => Json(ApiResponse::success(items)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn view_goods(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    match state.recycled.get(id).await {
        Ok(mut goods) => {
            // Stored paths use the static dir prefix; public URLs go through
            // the /static service
            if let Some(url) = goods.image_url.take() {
                let url = url.replace('\\', "/");
                goods.image_url =
                    Some(url.strip_prefix("static/").unwrap_or(&url).to_string());
            }
            Json(ApiResponse::success(goods)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn edit_recycled_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateRecycledItemRequest>,
) -> impl IntoResponse {
    match state.recycled.update(id, req).await {
        Ok(_) => Json(json!({"success": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_recycled_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.recycled.delete(id).await {
        Ok(_) => Json(json!({"success": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a recycled item from a multipart form:
/// text fields name/phone/item_name/introduction plus an image file part
async fn add_recycled_item(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut name = None;
    let mut phone = None;
    let mut item_name = None;
    let mut introduction = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("multipart error: {}", e)))?
    {
        match field.name() {
            Some("name") => name = Some(read_text(field).await?),
            Some("phone") => phone = Some(read_text(field).await?),
            Some("item_name") => item_name = Some(read_text(field).await?),
            Some("introduction") => introduction = Some(read_text(field).await?),
            Some("file") => file = Some(read_file(field).await?),
            _ => {}
        }
    }

    let Some((filename, data)) = file else {
        return Ok(no_file_part());
    };
    if filename.is_empty() {
        return Ok(no_selected_file());
    }

    let req = CreateRecycledItemRequest {
        name: name.ok_or_else(|| Error::Validation("missing field: name".to_string()))?,
        phone: phone.ok_or_else(|| Error::Validation("missing field: phone".to_string()))?,
        item_name: item_name
            .ok_or_else(|| Error::Validation("missing field: item_name".to_string()))?,
        description: introduction
            .ok_or_else(|| Error::Validation("missing field: introduction".to_string()))?,
    };

    let saved = state.uploads.save_recycle(&filename, &data).await?;
    let item = state
        .recycled
        .create(req, &saved.path.to_string_lossy())
        .await?;

    tracing::info!(item_id = item.id, image = %saved.file_name, "Recycled item added");

    Ok(Json(ApiResponse::success(item)).into_response())
}

// ========================================
// Classification Handler
// ========================================

/// Accept one image upload, save it, and return the top-3 predictions
async fn classify_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file = Some(read_file(field).await?);
        }
    }

    let Some((filename, data)) = file else {
        return Ok(no_file_part());
    };
    if filename.is_empty() {
        return Ok(no_selected_file());
    }

    let Some(classifier) = state.classifier.as_ref() else {
        return Err(Error::Internal(
            "classifier not loaded; set MODEL_PATH and CLASS_NAMES_PATH".to_string(),
        ));
    };

    let saved = state.uploads.save_classify(&filename, &data).await?;
    let predictions = classifier.classify_file(&saved.path).await?;

    tracing::info!(
        file = %saved.file_name,
        top = %predictions[0].class_name,
        confidence = %predictions[0].confidence,
        "Image classified"
    );

    let result = classification_payload(&predictions, &saved.file_name)?;
    Ok(Json(json!({
        "redirect_url": "/Classified/",
        "result": result
    }))
    .into_response())
}

/// Build the classification result object: cg1..cg3 class names and
/// pr1..pr3 probabilities as floats, plus the stored filename
fn classification_payload(predictions: &[Prediction], filename: &str) -> Result<serde_json::Value> {
    if predictions.len() != TOP_K {
        return Err(Error::Internal(format!(
            "expected {} predictions, got {}",
            TOP_K,
            predictions.len()
        )));
    }

    let prob = |p: &Prediction| -> Result<f64> {
        p.confidence
            .parse()
            .map_err(|_| Error::Internal(format!("unparsable confidence {:?}", p.confidence)))
    };

    Ok(json!({
        "cg1": predictions[0].class_name,
        "cg2": predictions[1].class_name,
        "cg3": predictions[2].class_name,
        "pr1": prob(&predictions[0])?,
        "pr2": prob(&predictions[1])?,
        "pr3": prob(&predictions[2])?,
        "filename": filename,
    }))
}

// ========================================
// Multipart Helpers
// ========================================

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| Error::Validation(format!("multipart error: {}", e)))
}

async fn read_file(field: axum::extract::multipart::Field<'_>) -> Result<(String, Bytes)> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| Error::Validation(format!("multipart error: {}", e)))?;
    Ok((filename, data))
}

fn no_file_part() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"message": "No file part"})),
    )
        .into_response()
}

fn no_selected_file() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"message": "No selected file"})),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pred(name: &str, confidence: &str) -> Prediction {
        Prediction {
            class_name: name.to_string(),
            confidence: confidence.to_string(),
        }
    }

    #[test]
    fn test_classification_payload_shape() {
        let preds = vec![
            pred("Apple scab", "0.93"),
            pred("Apple rust", "0.05"),
            pred("Healthy", "0.02"),
        ];
        let payload = classification_payload(&preds, "leaf_abc.jpg").unwrap();

        assert_eq!(payload["cg1"], "Apple scab");
        assert_eq!(payload["cg3"], "Healthy");
        assert_eq!(payload["pr1"], 0.93);
        assert_eq!(payload["pr3"], 0.02);
        assert_eq!(payload["filename"], "leaf_abc.jpg");
    }

    #[test]
    fn test_classification_payload_requires_three() {
        let preds = vec![pred("a", "0.99")];
        assert!(classification_payload(&preds, "x.jpg").is_err());
    }
}
