//! 费用核算
//!
//! 应收金额是三个输入的纯函数，任一输入变化即重算，不保存中间态。
//! 同时是状态机付费闸门(due == 0)咨询的权威来源。

/// 应收 = 总额 - 已收 - 折扣
///
/// 负的已收/折扣按原样参与计算，结果可以为负，
/// 表示多收/待退款，下游报表不得悄悄截断。
pub fn reconcile(total: f64, received: f64, discount: f64) -> f64 {
    total - received - discount
}

/// 付费闸门判定：应收是否已结清
pub fn is_settled(due: f64) -> bool {
    due == 0.0
}
