use std::ops::{Add, Sub, Mul};

/// グリッド原点のオフセット（座標を正の値に保つためだけの値で、物理的な意味はない）
pub const GRID_ORIGIN: f64 = 1000.0;

/// 平面座標を表す構造体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2 {
    pub x: f64, // m
    pub y: f64, // m
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 艦の中心（グリッド原点 1000, 1000）
    pub fn grid_origin() -> Self {
        Self::new(GRID_ORIGIN, GRID_ORIGIN)
    }

    /// 方位角（度）の単位ベクトル
    pub fn unit_from_azimuth(azimuth_deg: f64) -> Self {
        let rad = math_utils::deg_to_rad(azimuth_deg);
        Self::new(rad.cos(), rad.sin())
    }

    /// 2点間の距離
    pub fn distance_to(&self, other: &Vector2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// ベクトルの長さ
    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

/// 極座標オフセット（方位角と距離）
///
/// 観測手（コマンダー）が報告する目標位置や、着弾点の報告に使用します。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarOffset {
    pub azimuth_deg: f64,
    pub distance: f64, // m
}

impl PolarOffset {
    pub fn new(azimuth_deg: f64, distance: f64) -> Self {
        Self { azimuth_deg, distance }
    }
}

/// 風ベクトル（方位角と強さ）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindVector {
    pub azimuth_deg: f64,
    pub strength: f64, // m（砲弾の流され量）
}

impl WindVector {
    pub fn new(azimuth_deg: f64, strength: f64) -> Self {
        Self { azimuth_deg, strength }
    }

    /// 無風
    pub fn calm() -> Self {
        Self::new(0.0, 0.0)
    }

    /// 風による砲弾の変位量
    pub fn displacement(&self) -> Vector2 {
        Vector2::unit_from_azimuth(self.azimuth_deg) * self.strength
    }

    pub fn as_offset(&self) -> PolarOffset {
        PolarOffset::new(self.azimuth_deg, self.strength)
    }
}

impl Default for WindVector {
    fn default() -> Self {
        Self::calm()
    }
}

/// 数学ユーティリティ関数
pub mod math_utils {
    /// 度をラジアンに変換
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * std::f64::consts::PI / 180.0
    }

    /// ラジアンを度に変換
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * 180.0 / std::f64::consts::PI
    }

    /// 方位角を0度〜360度未満の範囲に正規化
    pub fn normalize_azimuth(angle_deg: f64) -> f64 {
        let normalized = angle_deg.rem_euclid(360.0);
        // rem_euclidは極小の負値に対して360.0を返すことがある
        if normalized >= 360.0 { 0.0 } else { normalized }
    }

    /// 小数点以下1桁に丸める
    pub fn round_to_tenth(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }

    /// 10の倍数に丸める（ちょうど中間の値は偶数側）
    pub fn round_to_nearest_ten(value: f64) -> f64 {
        (value / 10.0).round_ties_even() * 10.0
    }

    /// 表示用の方位角: 1桁に丸めてから正規化（359.96 → 0.0）
    pub fn round_azimuth(azimuth_deg: f64) -> f64 {
        normalize_azimuth(round_to_tenth(azimuth_deg))
    }
}

#[cfg(test)]
mod tests {
    use super::math_utils::*;
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_unit_from_azimuth() {
        let east = Vector2::unit_from_azimuth(0.0);
        assert_abs_diff_eq!(east.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(east.y, 0.0, epsilon = 1e-12);

        let north = Vector2::unit_from_azimuth(90.0);
        assert_abs_diff_eq!(north.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(north.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vector_ops() {
        let a = Vector2::new(1003.0, 1004.0);
        let b = Vector2::grid_origin();
        assert_eq!(a - b, Vector2::new(3.0, 4.0));
        assert_eq!((a - b) * 2.0, Vector2::new(6.0, 8.0));
        assert_eq!(b + Vector2::new(3.0, 4.0), a);
        assert_abs_diff_eq!(a.distance_to(&b), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wind_displacement() {
        let wind = WindVector::new(180.0, 20.0);
        let d = wind.displacement();
        assert_abs_diff_eq!(d.x, -20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d.y, 0.0, epsilon = 1e-9);
        assert_eq!(WindVector::default().displacement().magnitude(), 0.0);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round_to_tenth(53.130_102), 53.1);
        assert_eq!(round_to_tenth(126.869_897), 126.9);
        assert_eq!(round_to_nearest_ten(34.9), 30.0);
        assert_eq!(round_to_nearest_ten(35.1), 40.0);
        assert_eq!(round_to_nearest_ten(25.0), 20.0);
        assert_eq!(round_to_nearest_ten(4.0), 0.0);
    }

    #[test]
    fn test_round_azimuth_wraps_to_zero() {
        assert_eq!(round_azimuth(359.96), 0.0);
        assert_eq!(round_azimuth(360.0), 0.0);
        assert_eq!(round_azimuth(359.94), 359.9);
        assert_eq!(normalize_azimuth(-90.0), 270.0);
    }
}
