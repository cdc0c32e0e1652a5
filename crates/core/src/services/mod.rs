pub mod chart_service;
pub mod lesson_service;
pub mod quote_service;
pub mod tendency_service;
pub mod trading_service;
