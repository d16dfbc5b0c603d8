use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

/// One lock per source name, serializing schema application.
#[derive(Debug, Clone, Default)]
pub(crate) struct SyncGates {
    gates: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SyncGates {
    /// The gate of the source named `source`, created on first use.
    pub(crate) async fn get(&self, source: &str) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .await
            .entry(source.to_string())
            .or_default()
            .clone()
    }
}
