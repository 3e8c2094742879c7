use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize, Serializer};

/// Read model over the movies collection. The catalog data is sparse and
/// dirty, so everything beyond id and title is optional and unknown fields
/// are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
}

/// A per-movie comment. `movie_id` is never validated against the movies
/// collection; dangling references are tolerated. `date` is stamped at
/// creation and never touched by updates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id")]
    pub movie_id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub date: bson::DateTime,
}

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub search: String,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

impl MovieListQuery {
    /// Zero is treated the same as absent.
    pub fn normalize(&self) -> (u64, u64) {
        let page = if self.page == 0 { default_page() } else { self.page };
        let limit = if self.limit == 0 { default_limit() } else { self.limit };
        (page, limit)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListResponse {
    pub total_movies: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub base_url: String,
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

// ObjectIds and datetimes go out as plain strings rather than the extended
// JSON the bson serializers would otherwise produce.

fn serialize_object_id<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_hex())
}

fn serialize_datetime<S: Serializer>(
    date: &bson::DateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date.try_to_rfc3339_string() {
        Ok(formatted) => serializer.serialize_str(&formatted),
        Err(err) => Err(serde::ser::Error::custom(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_normalize_keeps_explicit_values() {
        let query = MovieListQuery { page: 3, limit: 5, search: String::new() };
        assert_eq!(query.normalize(), (3, 5));
    }

    #[test]
    fn query_normalize_replaces_zero_with_defaults() {
        let query = MovieListQuery { page: 0, limit: 0, search: String::new() };
        assert_eq!(query.normalize(), (1, 20));
    }

    #[test]
    fn movie_serializes_id_as_hex_and_skips_absent_fields() {
        let movie = Movie {
            id: ObjectId::parse_str("573a1390f29313caabcd4135").unwrap(),
            title: "Blacksmith Scene".to_string(),
            year: Some(1893),
            genres: vec!["Short".to_string()],
            poster: None,
            plot: None,
        };

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["_id"], "573a1390f29313caabcd4135");
        assert_eq!(json["year"], 1893);
        assert!(json.get("poster").is_none());
        assert!(json.get("plot").is_none());
    }

    #[test]
    fn comment_serializes_date_as_rfc3339() {
        let comment = Comment {
            id: ObjectId::parse_str("5a9427648b0beebeb69579e7").unwrap(),
            movie_id: ObjectId::parse_str("573a1390f29313caabcd4135").unwrap(),
            name: "Al".to_string(),
            text: "Great film".to_string(),
            date: bson::DateTime::from_millis(1_732_000_000_000),
        };

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["movie_id"], "573a1390f29313caabcd4135");
        let date = json["date"].as_str().unwrap();
        assert!(date.starts_with("2024-11-19T"), "unexpected date: {date}");
        assert!(date.ends_with('Z'));
    }

    #[test]
    fn list_response_uses_camel_case_keys() {
        let response = MovieListResponse {
            total_movies: 21,
            total_pages: 2,
            current_page: 1,
            movies: Vec::new(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalMovies"], 21);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["currentPage"], 1);
    }
}
