use crate::config::AppConfig;
use crate::rpc::Dispatcher;
use crate::users::UserStore;

#[derive(Clone)]
pub struct AppContext {
    pub config: std::sync::Arc<AppConfig>,
    pub dispatcher: Dispatcher,
    pub users: UserStore,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: std::sync::Arc::new(config),
            dispatcher: Dispatcher::default(),
            users: UserStore::new(),
        }
    }
}
