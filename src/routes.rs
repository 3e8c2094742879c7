use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use futures::TryStreamExt;
use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    AppState,
    collections::{self, Collection, parse_object_id},
    error::{AppError, AppResult},
    models::{
        Comment, ConfigResponse, CreateCommentRequest, Movie, MovieListQuery, MovieListResponse,
        StatusMessage, UpdateCommentRequest,
    },
};

pub async fn api_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse { base_url: state.config.base_url.clone() })
}

/// Paginated, searchable movie listing. No explicit sort key, so page
/// boundaries under concurrent writes follow store-native order.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MovieListQuery>,
) -> AppResult<Json<MovieListResponse>> {
    let (page, limit) = query.normalize();
    let skip = (page - 1) * limit;

    let filter = if query.search.is_empty() {
        doc! {}
    } else {
        // Case-insensitive substring match on the title.
        doc! { "title": { "$regex": query.search.as_str(), "$options": "i" } }
    };

    debug!(page = page, limit = limit, search = %query.search, "listing movies");

    let coll = state.db.collection::<Movie>(Collection::Movies.as_str());
    let total_movies = coll.count_documents(filter.clone()).await?;
    let movies: Vec<Movie> =
        coll.find(filter).skip(skip).limit(limit as i64).await?.try_collect().await?;

    Ok(Json(MovieListResponse {
        total_movies,
        total_pages: total_pages(total_movies, limit),
        current_page: page,
        movies,
    }))
}

fn total_pages(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit)
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let oid = parse_object_id(&id)?;
    let movie = state
        .db
        .collection::<Movie>(Collection::Movies.as_str())
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or(AppError::NotFound("Movie"))?;
    Ok(Json(movie))
}

// The specialized movie routes shadow only the GET verb; mutations on
// /movies go through the same generic operations as any other collection.

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    Ok(Json(collections::create_in(&state.db, Collection::Movies, body).await?))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<Json<StatusMessage>> {
    Ok(Json(collections::update_in(&state.db, Collection::Movies, &id, body).await?))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusMessage>> {
    Ok(Json(collections::delete_in(&state.db, Collection::Movies, &id).await?))
}

/// All comments for one movie, store-native order, no pagination.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Vec<Comment>>> {
    let oid = parse_object_id(&movie_id)?;
    let comments: Vec<Comment> = state
        .db
        .collection::<Comment>(Collection::Comments.as_str())
        .find(doc! { "movie_id": oid })
        .await?
        .try_collect()
        .await?;
    Ok(Json(comments))
}

/// The body only supplies name and text; movie_id comes from the path and
/// the date is stamped here, so client-supplied values for either are
/// ignored.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    Json(body): Json<CreateCommentRequest>,
) -> AppResult<Json<Comment>> {
    let movie_id = parse_object_id(&movie_id)?;
    let id = ObjectId::new();
    let date = DateTime::now();

    state
        .db
        .collection::<Document>(Collection::Comments.as_str())
        .insert_one(doc! {
            "_id": id,
            "movie_id": movie_id,
            "name": body.name.as_str(),
            "text": body.text.as_str(),
            "date": date,
        })
        .await?;

    debug!(comment_id = %id, movie_id = %movie_id, "created comment");

    Ok(Json(Comment { id, movie_id, name: body.name, text: body.text, date }))
}

pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
    Json(body): Json<UpdateCommentRequest>,
) -> AppResult<Json<StatusMessage>> {
    let oid = parse_object_id(&comment_id)?;
    let result = state
        .db
        .collection::<Document>(Collection::Comments.as_str())
        .update_one(doc! { "_id": oid }, doc! { "$set": { "text": body.text.as_str() } })
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::NotFound("Comment"));
    }
    Ok(Json(StatusMessage { message: "Comment updated successfully".to_string() }))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
) -> AppResult<Json<StatusMessage>> {
    let oid = parse_object_id(&comment_id)?;
    let result = state
        .db
        .collection::<Document>(Collection::Comments.as_str())
        .delete_one(doc! { "_id": oid })
        .await?;
    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Comment"));
    }
    Ok(Json(StatusMessage { message: "Comment deleted successfully".to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(100, 7), 15);
    }
}
