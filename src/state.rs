use std::sync::Arc;

use crate::{
    auth::jwt::JwtService, config::AppConfig, mailer::Mailer, prediction::DropoutPredictor,
    store::Store,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
    pub predictor: Arc<dyn DropoutPredictor>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        config: AppConfig,
        mailer: Arc<dyn Mailer>,
        predictor: Arc<dyn DropoutPredictor>,
        jwt: JwtService,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            mailer,
            predictor,
            jwt,
        }
    }
}
