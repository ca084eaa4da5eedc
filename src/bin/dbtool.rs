//! Debug dump of the store contents, table by table.
//!
//! Usage: `dbtool` (reads the same configuration as the server).

use sea_orm::EntityTrait;
use worksite_api::{config, db, entities};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let db = db::establish_connection_from_app_config(&cfg).await?;

    let projects = entities::project::Entity::find().all(&db).await?;
    println!("== projects ({}) ==", projects.len());
    for row in &projects {
        println!("{}", serde_json::to_string(row)?);
    }

    let workers = entities::worker::Entity::find().all(&db).await?;
    println!("== workers ({}) ==", workers.len());
    for row in &workers {
        println!("{}", serde_json::to_string(row)?);
    }

    let entries = entities::clock_entry::Entity::find().all(&db).await?;
    println!("== clock_entries ({}) ==", entries.len());
    for row in &entries {
        println!("{}", serde_json::to_string(row)?);
    }

    let users = entities::user::Entity::find().all(&db).await?;
    println!("== users ({}) ==", users.len());
    for row in &users {
        // Password column is skipped by the model's serializer.
        println!("{}", serde_json::to_string(row)?);
    }

    let tickets = entities::query_ticket::Entity::find().all(&db).await?;
    println!("== query_tickets ({}) ==", tickets.len());
    for row in &tickets {
        println!("{}", serde_json::to_string(row)?);
    }

    Ok(())
}
