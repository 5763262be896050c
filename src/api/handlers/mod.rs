use serde::Deserialize;

use crate::config::settings::AppConfig;
use crate::database::DbPool;

pub mod admin;
pub mod players;
pub mod ranking;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl PageParams {
    /// (page, page_size, offset) with defaults applied and the size capped.
    pub fn resolve(&self) -> (usize, usize, usize) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self.page_size.unwrap_or(100).clamp(1, 1000);
        (page, page_size, (page - 1) * page_size)
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub filter: Option<String>,
}
