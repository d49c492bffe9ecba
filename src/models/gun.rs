use std::fmt;

use crate::models::{
    bearing::quadrant_azimuth,
    common::{
        math_utils::{round_azimuth, round_to_tenth},
        Vector2,
    },
};

/// 射界の判定規則
///
/// 艦種・砲ごとに境界の開閉と「窓の内側で射撃可/不可」の極性が異なるため、
/// 一つの式に統一せず砲ごとに規則を持たせます。
/// 窓の中心は常に艦の針路で、半幅は艦種ごとの固定値です。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcRule {
    /// 射界制限なし
    Unrestricted,
    /// フリゲート砲: 非折り返し時は開区間の内側で射撃不可、
    /// 折り返し時は右端〜左端の開区間の内側でのみ射撃可
    SymmetricBlockOnWrap { half_width_deg: f64 },
    /// 戦艦前部砲: 非折り返し時は開区間の内側で射撃可、
    /// 折り返し時は右端〜左端の開区間の内側で射撃不可
    OpenAllowOnMatch { half_width_deg: f64 },
    /// 戦艦中部・後部砲: 境界を含む窓の内側で射撃不可
    ClosedInclusiveBlockOnMatch { half_width_deg: f64 },
}

/// 針路を中心とした射界判定用の窓
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcWindow {
    pub left_deg: f64,
    pub right_deg: f64,
}

impl ArcWindow {
    /// 針路 ± 半幅 の窓を作成
    ///
    /// 左端が0未満なら `針路 + (360 - 半幅)`、右端が360を超えるなら
    /// `針路 - (360 - 半幅)` に置き換えます。
    pub fn around_heading(heading_deg: f64, half_width_deg: f64) -> Self {
        let mut left = heading_deg - half_width_deg;
        if left < 0.0 {
            left = heading_deg + (360.0 - half_width_deg);
        }

        let mut right = heading_deg + half_width_deg;
        if right > 360.0 {
            right = heading_deg - (360.0 - half_width_deg);
        }

        Self {
            left_deg: left,
            right_deg: right,
        }
    }

    /// 窓が0度をまたいでいるか
    pub fn is_wrapped(&self) -> bool {
        self.left_deg >= self.right_deg
    }
}

impl ArcRule {
    pub fn half_width(&self) -> Option<f64> {
        match *self {
            ArcRule::Unrestricted => None,
            ArcRule::SymmetricBlockOnWrap { half_width_deg }
            | ArcRule::OpenAllowOnMatch { half_width_deg }
            | ArcRule::ClosedInclusiveBlockOnMatch { half_width_deg } => Some(half_width_deg),
        }
    }

    pub fn window(&self, heading_deg: f64) -> Option<ArcWindow> {
        self.half_width()
            .map(|half_width_deg| ArcWindow::around_heading(heading_deg, half_width_deg))
    }

    /// 指定方位角に射撃可能かどうか
    ///
    /// # 引数
    ///
    /// * `heading_deg` - 艦の針路（度）
    /// * `azimuth_deg` - 砲から目標への方位角（丸める前の値）
    pub fn can_fire(&self, heading_deg: f64, azimuth_deg: f64) -> bool {
        let Some(window) = self.window(heading_deg) else {
            return true;
        };
        let (left, right, a) = (window.left_deg, window.right_deg, azimuth_deg);

        match (self, window.is_wrapped()) {
            (ArcRule::SymmetricBlockOnWrap { .. }, false) => !(a > left && a < right),
            (ArcRule::SymmetricBlockOnWrap { .. }, true) => a < left && a > right,
            (ArcRule::OpenAllowOnMatch { .. }, false) => a > left && a < right,
            (ArcRule::OpenAllowOnMatch { .. }, true) => !(a < left && a > right),
            (ArcRule::ClosedInclusiveBlockOnMatch { .. }, false) => !(a >= left && a <= right),
            (ArcRule::ClosedInclusiveBlockOnMatch { .. }, true) => !(a >= left || a <= right),
            (ArcRule::Unrestricted, _) => true,
        }
    }
}

/// 砲の搭載位置と射界
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunSpec {
    /// 表示名（"Front Gun" など）
    pub label: &'static str,
    /// 艦の中心から針路方向への距離（正: 前方, 負: 後方）
    pub offset_along_heading: f64,
    pub arc: ArcRule,
}

impl GunSpec {
    pub const fn new(label: &'static str, offset_along_heading: f64, arc: ArcRule) -> Self {
        Self {
            label,
            offset_along_heading,
            arc,
        }
    }

    /// 艦の中心と針路から砲の平面座標を計算
    pub fn world_position(&self, ship_center: Vector2, heading_deg: f64) -> Vector2 {
        ship_center + Vector2::unit_from_azimuth(heading_deg) * self.offset_along_heading
    }

    /// 目標に対する射撃諸元を計算
    ///
    /// 射界判定は正規化前の方位角（x軸上では360）で行い、報告値のみ [0, 360) に丸めます。
    /// 射界外の場合は方位角を `None` とし、距離は常に報告します。
    pub fn evaluate(
        &self,
        gun_index: usize,
        ship_center: Vector2,
        heading_deg: f64,
        target: Vector2,
    ) -> FiringSolution {
        let position = self.world_position(ship_center, heading_deg);
        let delta = target - position;
        let azimuth = quadrant_azimuth(delta.x, delta.y);
        let in_arc = self.arc.can_fire(heading_deg, azimuth);

        FiringSolution {
            gun_index,
            label: self.label,
            azimuth_deg: in_arc.then(|| round_azimuth(azimuth)),
            distance: round_to_tenth(delta.magnitude()),
        }
    }
}

/// 1門分の射撃諸元
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiringSolution {
    pub gun_index: usize,
    pub label: &'static str,
    /// 射界外なら `None`（"No angle"）
    pub azimuth_deg: Option<f64>,
    pub distance: f64,
}

impl FiringSolution {
    pub fn is_blocked(&self) -> bool {
        self.azimuth_deg.is_none()
    }
}

impl fmt::Display for FiringSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.gun_index + 1;
        match self.azimuth_deg {
            Some(azimuth) => write!(
                f,
                "{}: Azimuth (A{}): {:.1}°, Distance (d{}): {:.1}",
                self.label, n, azimuth, n, self.distance
            ),
            None => write!(
                f,
                "{}: Azimuth (A{}): No angle, Distance (d{}): {:.1}",
                self.label, n, n, self.distance
            ),
        }
    }
}
