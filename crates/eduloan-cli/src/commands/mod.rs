pub mod calculate;
pub mod export;
pub mod session;
pub mod theme;
