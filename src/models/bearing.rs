use crate::models::common::{
    math_utils::{normalize_azimuth, rad_to_deg, round_azimuth, round_to_tenth},
    PolarOffset, Vector2,
};

/// 方位角と距離の組
///
/// 方位角はこのシステム独自の象限規則（`bearing_from_delta`）で求めた値で、
/// 一般的なコンパス方位ではありません。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bearing {
    pub azimuth_deg: f64,
    pub distance: f64,
}

impl Bearing {
    /// 方位角・距離ともに小数点以下1桁へ丸めた値
    pub fn rounded(&self) -> Self {
        Self {
            azimuth_deg: round_azimuth(self.azimuth_deg),
            distance: round_to_tenth(self.distance),
        }
    }
}

/// 極座標オフセットを平面座標に変換
///
/// # 引数
///
/// * `origin` - 基準点
/// * `offset` - 基準点からの方位角と距離
pub fn polar_to_point(origin: Vector2, offset: PolarOffset) -> Vector2 {
    origin + Vector2::unit_from_azimuth(offset.azimuth_deg) * offset.distance
}

/// 座標差分から象限分岐表どおりの方位角を計算（正規化前）
///
/// 象限の判定は atan2 ではなく atan(dy/dx) の絶対値と符号分岐で行います。
/// 軸上の扱いが atan2 と異なるため、分岐表は次の通り固定です。
///
/// * `dx == 0` : `dy > 0` なら90度、それ以外（`dy == 0` を含む）は270度
/// * `dy > 0, dx > 0` : r
/// * `dy > 0, dx < 0` : 180 - r
/// * `dy < 0, dx < 0` : 180 + r
/// * その他（`dy == 0` を含む）: 360 - r
///
/// 戻り値は [0, 360] で、`dy == 0` のとき360になります。
/// 射界判定はこの値で行い、表示用の値は [`bearing_from_delta`] で正規化します。
pub fn quadrant_azimuth(dx: f64, dy: f64) -> f64 {
    if dx == 0.0 {
        return if dy > 0.0 { 90.0 } else { 270.0 };
    }

    let r = rad_to_deg((dy / dx).atan()).abs();
    if dy > 0.0 && dx > 0.0 {
        r
    } else if dy > 0.0 && dx < 0.0 {
        180.0 - r
    } else if dy < 0.0 && dx < 0.0 {
        180.0 + r
    } else {
        360.0 - r
    }
}

/// 座標差分から方位角と距離を計算
///
/// 方位角は [`quadrant_azimuth`] を [0, 360) に正規化した値です（360は0）。
/// 0除算は `dx == 0` の分岐で回避されるため、有限値に対して失敗しません。
pub fn bearing_from_delta(dx: f64, dy: f64) -> Bearing {
    Bearing {
        azimuth_deg: normalize_azimuth(quadrant_azimuth(dx, dy)),
        distance: (dx.powi(2) + dy.powi(2)).sqrt(),
    }
}

/// 2点間の方位角と距離（`from` から `to` へ）
pub fn bearing_between(from: Vector2, to: Vector2) -> Bearing {
    let delta = to - from;
    bearing_from_delta(delta.x, delta.y)
}
