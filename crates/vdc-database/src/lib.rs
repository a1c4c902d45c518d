//! # VDC数据库模块
//!
//! [`vdc_core::PatientStore`] 契约的 Postgres 实现。
//! 旧存储把金额等数值以字符串落库，本模块在读边界一次性解析为
//! 类型化数值（解析失败按 0 处理），不把原始字符串外传。

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::DatabasePool;
pub use queries::PostgresPatientStore;
