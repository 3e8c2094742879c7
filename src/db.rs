use mongodb::{Client, Database, bson::doc};

use crate::error::AppResult;

/// Connect and ping once so a bad URI or unreachable cluster is fatal at
/// startup instead of surfacing on the first request.
pub async fn connect(uri: &str, db_name: &str) -> AppResult<Database> {
    let client = Client::with_uri_str(uri).await?;
    let db = client.database(db_name);

    db.run_command(doc! { "ping": 1 }).await?;
    tracing::info!(db = %db.name(), "connected to MongoDB");

    Ok(db)
}
