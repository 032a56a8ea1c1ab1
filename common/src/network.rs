pub mod access_point;
pub mod interface;
pub mod mac;
