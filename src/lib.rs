//! 艦砲射撃の諸元計算ライブラリ
//!
//! 艦の針路、観測手が報告した目標の方位角・距離、風から各砲の射撃方位と距離を求め、
//! 較正射撃の着弾点から風を逆算します。計算はすべて平面幾何のみで、弾道は扱いません。

pub mod engine;
pub mod logging;
pub mod mission;
pub mod models;
