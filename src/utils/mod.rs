pub mod data;
pub mod mock_data;
pub mod parlay;
pub mod retry;
