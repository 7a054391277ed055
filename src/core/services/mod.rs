pub mod statistics_service;

pub use statistics_service::StatisticsService;
