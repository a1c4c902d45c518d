//! 患者状态机
//!
//! 管理患者从前台登记、路由到护士站/控制台、直至检查完成的
//! 全生命周期状态转换，并暴露 UI 动作使用的闸门谓词。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vdc_core::{Category, PatientStatus, Result, ScanStatus, SelectedScan, VdcError};

/// 患者状态转换事件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PatientEvent {
    SendToConsole, // 前台"送护士站/控制台"
    SendBack,      // 临床人员拒收，召回前台
    Finalize,      // 控制台结束检查
    ReRegister,    // 被召回患者重新进入前台队列
}

/// 患者状态机
///
/// 转换表只描述形状；付费闸门与完成闸门由谓词单独判定，
/// 前置条件不满足的转换一律拒绝且不产生任何状态变更。
#[derive(Debug)]
pub struct PatientStateMachine {
    transitions: HashMap<(PatientStatus, PatientEvent), PatientStatus>,
}

impl PatientStateMachine {
    /// 创建新的状态机实例
    pub fn new() -> Self {
        let mut transitions = HashMap::new();

        transitions.insert(
            (PatientStatus::Awaiting, PatientEvent::SendToConsole),
            PatientStatus::InCorridorQueue,
        );
        transitions.insert(
            (PatientStatus::InCorridorQueue, PatientEvent::SendBack),
            PatientStatus::Recall,
        );
        transitions.insert(
            (PatientStatus::InCorridorQueue, PatientEvent::Finalize),
            PatientStatus::Complete,
        );
        // 搁置的患者可在剩余扫描完成后再次结束检查
        transitions.insert(
            (PatientStatus::Pending, PatientEvent::Finalize),
            PatientStatus::Complete,
        );
        transitions.insert(
            (PatientStatus::Recall, PatientEvent::ReRegister),
            PatientStatus::Awaiting,
        );
        // 不存在 Awaiting -> Complete 的直达路径，路由是强制环节

        Self { transitions }
    }

    /// 检查状态转换形状是否有效
    pub fn can_transition(&self, from: &PatientStatus, event: &PatientEvent) -> bool {
        self.transitions
            .contains_key(&(from.clone(), event.clone()))
    }

    /// 执行状态转换（仅形状，不含闸门）
    pub fn transition(&self, from: &PatientStatus, event: &PatientEvent) -> Result<PatientStatus> {
        match self.transitions.get(&(from.clone(), event.clone())) {
            Some(to) => Ok(to.clone()),
            None => Err(VdcError::TransitionRejected {
                from: format!("{:?}", from),
                event: format!("{:?}", event),
                reason: "no such transition".to_string(),
            }),
        }
    }

    /// 付费闸门：应收结清或该分类不要求付费才允许路由
    pub fn routing_allowed(category: &Category, due_amount: f64) -> bool {
        vdc_registration::is_settled(due_amount) || !category.requires_payment()
    }

    /// 完成闸门：每一个扫描项目都独立达到 Complete 才允许患者级完成
    pub fn completion_allowed(scans: &[SelectedScan]) -> bool {
        !scans.is_empty() && scans.iter().all(|s| s.status == ScanStatus::Complete)
    }

    /// Finalize 的落点：全部完成则 Complete，尚有未完成则搁置为 Pending
    pub fn finalize_target(scans: &[SelectedScan]) -> PatientStatus {
        if Self::completion_allowed(scans) {
            PatientStatus::Complete
        } else {
            PatientStatus::Pending
        }
    }

    /// 获取所有可能的状态
    pub fn get_all_states() -> Vec<PatientStatus> {
        vec![
            PatientStatus::Awaiting,
            PatientStatus::InCorridorQueue,
            PatientStatus::Recall,
            PatientStatus::Pending,
            PatientStatus::Complete,
        ]
    }

    /// 获取状态的所有可能事件
    pub fn get_possible_events(&self, current_state: &PatientStatus) -> Vec<PatientEvent> {
        self.transitions
            .keys()
            .filter(|(state, _)| state == current_state)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

impl Default for PatientStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
