use std::{str::FromStr, sync::Arc};

use axum::{
    Json,
    extract::{Path, State},
};
use futures::TryStreamExt;
use mongodb::{
    Database,
    bson::{self, Bson, Document, doc, oid::ObjectId},
};
use serde_json::{Map, Value};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::StatusMessage,
};

/// The closed set of collections the generic CRUD surface may touch.
/// Parsing the path segment into this enum is the only gate between a
/// request and the store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Collection {
    Movies,
    Comments,
    Sessions,
    Theaters,
    Users,
    EmbeddedMovies,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Movies => "movies",
            Collection::Comments => "comments",
            Collection::Sessions => "sessions",
            Collection::Theaters => "theaters",
            Collection::Users => "users",
            Collection::EmbeddedMovies => "embedded_movies",
        }
    }

    pub fn handle(self, db: &Database) -> mongodb::Collection<Document> {
        db.collection(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movies" => Ok(Collection::Movies),
            "comments" => Ok(Collection::Comments),
            "sessions" => Ok(Collection::Sessions),
            "theaters" => Ok(Collection::Theaters),
            "users" => Ok(Collection::Users),
            "embedded_movies" => Ok(Collection::EmbeddedMovies),
            other => Err(AppError::InvalidCollection(other.to_string())),
        }
    }
}

pub fn parse_object_id(raw: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> AppResult<Json<Vec<Value>>> {
    Ok(Json(list_in(&state.db, collection.parse()?).await?))
}

pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    Ok(Json(get_in(&state.db, collection.parse()?, &id).await?))
}

pub async fn create_document(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    Ok(Json(create_in(&state.db, collection.parse()?, body).await?))
}

pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<Json<StatusMessage>> {
    Ok(Json(update_in(&state.db, collection.parse()?, &id, body).await?))
}

pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
) -> AppResult<Json<StatusMessage>> {
    Ok(Json(delete_in(&state.db, collection.parse()?, &id).await?))
}

/// Full unfiltered scan. Fine for the sample dataset, unbounded on anything
/// larger.
pub async fn list_in(db: &Database, collection: Collection) -> AppResult<Vec<Value>> {
    let docs: Vec<Document> = collection.handle(db).find(doc! {}).await?.try_collect().await?;
    Ok(docs.iter().map(document_to_json).collect())
}

pub async fn get_in(db: &Database, collection: Collection, id: &str) -> AppResult<Value> {
    let oid = parse_object_id(id)?;
    let document = collection
        .handle(db)
        .find_one(doc! { "_id": oid })
        .await?
        .ok_or(AppError::NotFound("Document"))?;
    Ok(document_to_json(&document))
}

/// Insert the submitted object verbatim and echo it back merged with the
/// generated id.
pub async fn create_in(
    db: &Database,
    collection: Collection,
    body: Map<String, Value>,
) -> AppResult<Value> {
    let document =
        bson::to_document(&body).map_err(|err| AppError::InvalidBody(err.to_string()))?;
    let inserted = collection.handle(db).insert_one(document).await?;

    let mut merged = Map::new();
    merged.insert("_id".to_string(), bson_to_json(&inserted.inserted_id));
    merged.extend(body);
    Ok(Value::Object(merged))
}

pub async fn update_in(
    db: &Database,
    collection: Collection,
    id: &str,
    body: Map<String, Value>,
) -> AppResult<StatusMessage> {
    let oid = parse_object_id(id)?;
    let updates =
        bson::to_document(&body).map_err(|err| AppError::InvalidBody(err.to_string()))?;

    // $set merges at field level; untouched fields survive.
    let result =
        collection.handle(db).update_one(doc! { "_id": oid }, doc! { "$set": updates }).await?;
    if result.matched_count == 0 {
        return Err(AppError::NotFound("Document"));
    }
    Ok(StatusMessage { message: "Document updated successfully".to_string() })
}

pub async fn delete_in(db: &Database, collection: Collection, id: &str) -> AppResult<StatusMessage> {
    let oid = parse_object_id(id)?;
    let result = collection.handle(db).delete_one(doc! { "_id": oid }).await?;
    if result.deleted_count == 0 {
        return Err(AppError::NotFound("Document"));
    }
    Ok(StatusMessage { message: "Document deleted successfully".to_string() })
}

/// Convert BSON to the plain JSON clients expect: ObjectIds become hex
/// strings and datetimes RFC 3339 strings instead of extended-JSON wrappers.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => {
            dt.try_to_rfc3339_string().map(Value::String).unwrap_or(Value::Null)
        }
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        other => other.clone().into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: &Document) -> Value {
    Value::Object(doc.iter().map(|(key, value)| (key.clone(), bson_to_json(value))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_parse_accepts_allow_list() {
        for name in ["movies", "comments", "sessions", "theaters", "users", "embedded_movies"] {
            let collection: Collection = name.parse().unwrap();
            assert_eq!(collection.as_str(), name);
        }
    }

    #[test]
    fn collection_parse_rejects_unknown_names() {
        for name in ["films", "Movies", "movies ", "", "admin"] {
            assert!(matches!(
                name.parse::<Collection>(),
                Err(AppError::InvalidCollection(_))
            ));
        }
    }

    #[test]
    fn object_id_parse_rejects_malformed_input() {
        assert!(parse_object_id("573a1390f29313caabcd4135").is_ok());
        assert!(matches!(parse_object_id("abc123"), Err(AppError::InvalidId(_))));
        assert!(matches!(parse_object_id(""), Err(AppError::InvalidId(_))));
    }

    #[test]
    fn bson_converts_to_plain_json() {
        let oid = ObjectId::parse_str("573a1390f29313caabcd4135").unwrap();
        let doc = doc! {
            "_id": oid,
            "title": "The Matrix",
            "year": 1999_i32,
            "genres": ["Action", "Sci-Fi"],
            "released": bson::DateTime::from_millis(922_665_600_000),
            "imdb": { "rating": 8.7 },
        };

        let json = document_to_json(&doc);
        assert_eq!(json["_id"], "573a1390f29313caabcd4135");
        assert_eq!(json["title"], "The Matrix");
        assert_eq!(json["year"], 1999);
        assert_eq!(json["genres"], serde_json::json!(["Action", "Sci-Fi"]));
        assert_eq!(json["imdb"]["rating"], 8.7);
        assert!(json["released"].as_str().unwrap().starts_with("1999-03-"));
    }
}
