//! # VDC Core
//!
//! 诊断影像中心(CT)管理系统的核心模块，提供基础数据结构、错误定义、
//! 外部存储契约和通用工具。

pub mod error;
pub mod models;
pub mod store;
pub mod utils;

pub use error::{Result, VdcError};
pub use models::*;
pub use store::{MemoryPatientStore, PatientStore};
