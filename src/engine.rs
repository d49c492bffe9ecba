//! # Engine モジュール
//!
//! 艦砲の射撃諸元を計算する射撃管制エンジンを提供します。
//!
//! エンジンは艦種ごとの砲配置（[`GunLayout`]）だけを保持し、艦の針路・観測手の
//! 報告値・風は呼び出しごとに引数で受け取ります。内部に可変状態を持たないため、
//! 同じ入力に対しては常に同じ結果を返します。
//!
//! ## 主要機能
//!
//! - **目標点の計算**: 観測手の報告（方位角・距離）から風の影響を差し引いた照準点を算出
//! - **砲ごとの射撃諸元**: 各砲の位置から照準点への方位角・距離と射界判定
//! - **風の逆算**: 基準砲の較正射撃の着弾点から風向・風力を推定
//!
//! ## 座標系
//!
//! 艦の中心をグリッド原点 (1000, 1000) に置いた平面座標を使います。
//! 原点のオフセットは値を正に保つためだけのもので、物理的な意味はありません。
//!
//! ## 使用例
//!
//! ```rust
//! use navalcalc::engine::FiringSolutionEngine;
//! use navalcalc::models::{PolarOffset, ShipClass, WindVector};
//!
//! let engine = FiringSolutionEngine::for_ship(ShipClass::Battleship);
//! let solutions = engine.compute_battery_solutions(
//!     0.0,
//!     PolarOffset::new(45.0, 300.0),
//!     WindVector::calm(),
//! );
//! assert_eq!(solutions.len(), 3);
//! ```

use crate::models::*;
use tracing::{debug, trace, warn};

/// 射撃管制エンジン
#[derive(Debug, Clone, Copy)]
pub struct FiringSolutionEngine {
    layout: &'static GunLayout,
    ship_center: Vector2,
}

impl FiringSolutionEngine {
    pub fn new(layout: &'static GunLayout) -> Self {
        Self {
            layout,
            ship_center: Vector2::grid_origin(),
        }
    }

    pub fn for_ship(ship_class: ShipClass) -> Self {
        Self::new(ship_class.layout())
    }

    pub fn layout(&self) -> &'static GunLayout {
        self.layout
    }

    pub fn ship_center(&self) -> Vector2 {
        self.ship_center
    }

    /// 照準点の計算
    ///
    /// 観測手が報告した目標点から風による変位を差し引きます。
    /// 風上側に照準をずらすことで、砲弾が風に流されて目標点に着弾します。
    ///
    /// # 引数
    ///
    /// * `commander` - 艦の中心から目標への方位角と距離
    /// * `wind` - 風向と風力
    pub fn compute_target_point(&self, commander: PolarOffset, wind: WindVector) -> Vector2 {
        let spotted = polar_to_point(self.ship_center, commander);
        let target = spotted - wind.displacement();

        trace!(
            "照準点: 報告点({:.2}, {:.2}) - 風({:.1}°, {:.1}) = ({:.2}, {:.2})",
            spotted.x, spotted.y, wind.azimuth_deg, wind.strength, target.x, target.y
        );

        target
    }

    /// 1門分の射撃諸元を計算
    ///
    /// 砲のインデックスが配置外の場合は `None` を返します。
    pub fn compute_gun_solution(
        &self,
        gun_index: usize,
        heading_deg: f64,
        target: Vector2,
    ) -> Option<FiringSolution> {
        let gun = self.layout.guns.get(gun_index)?;
        let solution = gun.evaluate(gun_index, self.ship_center, heading_deg, target);

        match solution.azimuth_deg {
            Some(azimuth) => debug!(
                "{} {}: 方位 {:.1}°, 距離 {:.1}",
                self.layout.ship_class, gun.label, azimuth, solution.distance
            ),
            None => debug!(
                "{} {}: 射界外, 距離 {:.1}",
                self.layout.ship_class, gun.label, solution.distance
            ),
        }

        Some(solution)
    }

    /// 全砲の射撃諸元を砲の並び順で計算
    pub fn compute_battery_solutions(
        &self,
        heading_deg: f64,
        commander: PolarOffset,
        wind: WindVector,
    ) -> Vec<FiringSolution> {
        let target = self.compute_target_point(commander, wind);

        (0..self.layout.gun_count())
            .filter_map(|index| self.compute_gun_solution(index, heading_deg, target))
            .collect()
    }

    /// 較正射撃の着弾点から風を逆算
    ///
    /// 基準砲（射撃順で2番目の砲）が観測手の報告値そのままで射撃した前提で、
    /// 予想着弾点は基準砲の位置から、実着弾点は艦の中心から計算します。
    /// 差分の方位角を小数点以下1桁に、風力を10の倍数に丸めて返します。
    ///
    /// # 引数
    ///
    /// * `heading_deg` - 艦の針路
    /// * `commander` - 基準砲に指示した方位角と距離
    /// * `explosion` - 艦の中心から観測した着弾点の方位角と距離
    pub fn compute_wind_from_impact(
        &self,
        heading_deg: f64,
        commander: PolarOffset,
        explosion: PolarOffset,
    ) -> WindVector {
        let reference_position = match self.layout.reference_gun() {
            Some(reference) => {
                if !reference.arc.can_fire(heading_deg, commander.azimuth_deg) {
                    warn!(
                        "{} {} は方位 {:.1}° に射撃できません（針路 {:.1}°）",
                        self.layout.ship_class, reference.label, commander.azimuth_deg, heading_deg
                    );
                }
                reference.world_position(self.ship_center, heading_deg)
            }
            None => {
                warn!(
                    "{} の基準砲 {} が配置にありません。艦の中心を基準にします",
                    self.layout.ship_class, self.layout.reference_gun
                );
                self.ship_center
            }
        };
        let expected = polar_to_point(reference_position, commander);
        let actual = polar_to_point(self.ship_center, explosion);

        let bearing = bearing_between(expected, actual);
        let wind = WindVector::new(
            math_utils::round_azimuth(bearing.azimuth_deg),
            math_utils::round_to_nearest_ten(bearing.distance),
        );

        debug!(
            "風の逆算: 予想({:.2}, {:.2}) 実測({:.2}, {:.2}) → 風向 {:.1}°, 風力 {}",
            expected.x, expected.y, actual.x, actual.y, wind.azimuth_deg, wind.strength
        );

        wind
    }
}

impl IFireControl for FiringSolutionEngine {
    fn ship_class(&self) -> ShipClass {
        self.layout.ship_class
    }

    fn solve(&self, heading_deg: f64, commander: PolarOffset, wind: WindVector) -> Vec<FiringSolution> {
        self.compute_battery_solutions(heading_deg, commander, wind)
    }

    fn calibrate(&self, heading_deg: f64, commander: PolarOffset, explosion: PolarOffset) -> WindVector {
        self.compute_wind_from_impact(heading_deg, commander, explosion)
    }
}
