//! 登记号(CRO)生成
//!
//! 格式 `VDC/<DD-MM-YYYY>/<序号>`，序号在单个登记日期内从 1 起稠密递增，
//! 每天重置。序号依据存储中该日期已有记录数，不在内存里维护计数器，
//! 避免多会话间漂移；并发冲突交由存储层的唯一约束兜底，调用方冲突后
//! 重试一次生成。

use chrono::NaiveDate;
use uuid::Uuid;
use vdc_core::{utils, PatientStore, Result};

/// 降级登记号的序号前缀，保证与正式序号在结构上可区分
const FALLBACK_PREFIX: &str = "TMP-";

/// 生成某登记日期的下一个登记号
pub async fn generate_cro(date: NaiveDate, store: &dyn PatientStore) -> Result<String> {
    let count = store.count_by_registration_date(date).await?;
    let sequence = count + 1;
    Ok(format!("VDC/{}/{}", utils::format_date_dmy(date), sequence))
}

/// 存储不可用时的降级占位登记号
///
/// 序号位换成非确定性后缀，避免与正式序号碰撞；
/// 占位号绝不能被当作权威登记号继续使用。
pub fn fallback_cro(date: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "VDC/{}/{}{}",
        utils::format_date_dmy(date),
        FALLBACK_PREFIX,
        &suffix[..8]
    )
}

/// 判断是否为降级占位登记号
pub fn is_fallback_cro(cro: &str) -> bool {
    cro.rsplit('/')
        .next()
        .map(|seq| seq.starts_with(FALLBACK_PREFIX))
        .unwrap_or(false)
}
