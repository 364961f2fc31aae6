use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{BookingRepository, ResourceRepository, UserRepository};
use crate::domain::services::{
    admin_queries::AdminQueries, booking_service::BookingService,
    directory::UserDirectory, ledger::BookingLedger,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resource_repo: Arc<dyn ResourceRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub ledger: Arc<BookingLedger>,
    pub booking_service: Arc<BookingService>,
    pub admin_queries: Arc<AdminQueries>,
    pub directory: Arc<UserDirectory>,
}

impl AppState {
    /// Wires the services over a set of repositories.
    pub fn new(
        config: Config,
        resource_repo: Arc<dyn ResourceRepository>,
        user_repo: Arc<dyn UserRepository>,
        booking_repo: Arc<dyn BookingRepository>,
    ) -> Self {
        let ledger = Arc::new(BookingLedger::new(booking_repo.clone(), config.timezone));
        let booking_service = Arc::new(BookingService::new(ledger.clone(), resource_repo.clone(), user_repo.clone()));
        let admin_queries = Arc::new(AdminQueries::new(ledger.clone(), user_repo.clone(), resource_repo.clone()));
        let directory = Arc::new(UserDirectory::new(user_repo.clone()));

        Self {
            config,
            resource_repo,
            user_repo,
            booking_repo,
            ledger,
            booking_service,
            admin_queries,
            directory,
        }
    }
}
