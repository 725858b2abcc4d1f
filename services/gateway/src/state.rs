use relay_engine::RelayEngine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RelayEngine>,
}

impl AppState {
    pub fn new(engine: Arc<RelayEngine>) -> Self {
        Self { engine }
    }
}
