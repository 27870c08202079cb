//! `ping`: no input, no database. Confirms the runner itself works.

use adminrun_db::{ConnectionManager, Connector};
use async_trait::async_trait;

use crate::script::Script;

pub const IDENTIFIER: &str = "ping";

#[derive(Debug, Default)]
pub struct Ping;

impl Ping {
    pub fn boxed<K: Connector>() -> Box<dyn Script<K>> {
        Box::new(Self)
    }
}

#[async_trait]
impl<K: Connector> Script<K> for Ping {
    async fn execute(&mut self, db: &ConnectionManager<K>) -> anyhow::Result<()> {
        let environment = db.environment().await;
        tracing::info!(%environment, "pong");
        Ok(())
    }
}
