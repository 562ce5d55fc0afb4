use contact_api::{http, storage};
use dotenvy::dotenv;
use env_logger::Env;
use std::env;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| String::from("database.db"));

    let pool = storage::build_pool(&database_url).expect("Could not build connection pool");

    {
        let connection = &mut pool.get().expect("Could not get connection from pool");
        storage::ensure_schema(connection).expect("Could not create contacts table");
    }

    http::listen(pool).await;
}
