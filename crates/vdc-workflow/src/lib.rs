//! # VDC工作流模块
//!
//! 提供患者检查生命周期的工作流管理功能，包括：
//! - 患者状态机：前台等待 → 护士站/控制台 → 完成的全生命周期转换
//! - 闸门谓词：路由前的付费闸门与完成前的扫描聚合闸门
//! - 工作流引擎：协调登记号、费用核算与状态转换的统一入口

pub mod engine;
pub mod state_machine;

// 重新导出主要类型
pub use engine::{NewRegistration, WorkflowEngine};
pub use state_machine::{PatientEvent, PatientStateMachine};
