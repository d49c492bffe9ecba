use crate::models::{
    common::{PolarOffset, WindVector},
    gun::FiringSolution,
    layout::ShipClass,
};

/// 射撃管制のインターフェース
///
/// 艦の針路や観測値は呼び出しごとに受け取り、実装側では保持しません。
pub trait IFireControl {
    /// 対象の艦種
    fn ship_class(&self) -> ShipClass;

    /// 全砲の射撃諸元を砲の並び順で計算
    fn solve(&self, heading_deg: f64, commander: PolarOffset, wind: WindVector) -> Vec<FiringSolution>;

    /// 較正射撃の着弾点から風を逆算
    fn calibrate(&self, heading_deg: f64, commander: PolarOffset, explosion: PolarOffset) -> WindVector;
}
