use dashboard_application::AppState;

use crate::views::Views;

#[derive(Clone)]
pub struct WebState {
    pub app: AppState,
    pub views: Views,
}
