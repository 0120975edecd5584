pub mod appsettings;
pub mod reminder;
pub mod session;
pub mod storage;
pub mod store;
pub mod transfer;
