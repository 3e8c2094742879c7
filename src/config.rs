use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub base_url: String,
    pub public_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let mongodb_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongodb_db = std::env::var("MONGODB_DB").unwrap_or_else(|_| "sample_mflix".to_string());

        let base_url =
            std::env::var("BASE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let public_dir = std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string());

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            mongodb_uri,
            mongodb_db,
            base_url,
            public_dir,
        })
    }
}
