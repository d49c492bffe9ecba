// 基本的なデータ型と数学ユーティリティ
pub mod common;

// 極座標・方位角の計算
pub mod bearing;

// 砲の射界と射撃諸元
pub mod gun;

// 艦種ごとの砲配置
pub mod layout;

// 射撃管制のインターフェース（trait）定義
pub mod traits;

// 便利な re-export
pub use common::*;
pub use traits::*;
pub use bearing::{Bearing, bearing_between, bearing_from_delta, polar_to_point, quadrant_azimuth};
pub use gun::{ArcRule, ArcWindow, FiringSolution, GunSpec};
pub use layout::{BATTLESHIP, FRIGATE, GunLayout, ShipClass};
