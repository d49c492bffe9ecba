use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::gun::{ArcRule, GunSpec};

/// 艦種
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipClass {
    /// 2門搭載のフリゲート
    Frigate,
    /// 3門搭載の戦艦（前部・中部・後部）
    #[serde(alias = "calahan")]
    Battleship,
}

impl ShipClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipClass::Frigate => "frigate",
            ShipClass::Battleship => "battleship",
        }
    }

    pub fn layout(&self) -> &'static GunLayout {
        match self {
            ShipClass::Frigate => &FRIGATE,
            ShipClass::Battleship => &BATTLESHIP,
        }
    }
}

impl FromStr for ShipClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frigate" => Ok(ShipClass::Frigate),
            "battleship" | "calahan" | "calahanbs" => Ok(ShipClass::Battleship),
            _ => Err(format!("unknown ship class: {}. available: frigate, battleship", s)),
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 艦種ごとの砲配置
///
/// 砲の並びは表示順（前部→後部）を兼ねており、並べ替えてはいけません。
#[derive(Debug, PartialEq)]
pub struct GunLayout {
    pub ship_class: ShipClass,
    pub guns: &'static [GunSpec],
    /// 風の較正射撃に使う砲のインデックス（射撃順で2番目の砲）
    pub reference_gun: usize,
}

impl GunLayout {
    pub fn gun_count(&self) -> usize {
        self.guns.len()
    }

    /// 較正射撃に使う砲。インデックスが配置外なら `None`
    pub fn reference_gun(&self) -> Option<&GunSpec> {
        self.guns.get(self.reference_gun)
    }
}

/// フリゲート: 両砲とも中心より後方。2番砲には射界判定がない
pub static FRIGATE: GunLayout = GunLayout {
    ship_class: ShipClass::Frigate,
    guns: &[
        GunSpec::new("Middle Gun", -6.4, ArcRule::SymmetricBlockOnWrap { half_width_deg: 30.0 }),
        GunSpec::new("Rear Gun", -19.8, ArcRule::Unrestricted),
    ],
    reference_gun: 1,
};

pub static BATTLESHIP: GunLayout = GunLayout {
    ship_class: ShipClass::Battleship,
    guns: &[
        GunSpec::new("Front Gun", 11.0, ArcRule::OpenAllowOnMatch { half_width_deg: 135.0 }),
        GunSpec::new("Middle Gun", -11.0, ArcRule::ClosedInclusiveBlockOnMatch { half_width_deg: 45.0 }),
        GunSpec::new("Rear Gun", -26.0, ArcRule::ClosedInclusiveBlockOnMatch { half_width_deg: 45.0 }),
    ],
    reference_gun: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_class_from_str() {
        assert_eq!(ShipClass::from_str("frigate"), Ok(ShipClass::Frigate));
        assert_eq!(ShipClass::from_str("Battleship"), Ok(ShipClass::Battleship));
        assert_eq!(ShipClass::from_str("CalahanBS"), Ok(ShipClass::Battleship));
        assert!(ShipClass::from_str("destroyer").is_err());
    }

    #[test]
    fn test_layout_offsets_in_order() {
        let offsets: Vec<f64> = FRIGATE.guns.iter().map(|g| g.offset_along_heading).collect();
        assert_eq!(offsets, vec![-6.4, -19.8]);

        let offsets: Vec<f64> = BATTLESHIP.guns.iter().map(|g| g.offset_along_heading).collect();
        assert_eq!(offsets, vec![11.0, -11.0, -26.0]);
    }

    #[test]
    fn test_reference_gun_is_second() {
        assert_eq!(FRIGATE.reference_gun().map(|g| g.offset_along_heading), Some(-19.8));
        assert_eq!(BATTLESHIP.reference_gun().map(|g| g.offset_along_heading), Some(-11.0));
        assert_eq!(BATTLESHIP.reference_gun().map(|g| g.label), Some("Middle Gun"));
    }

    #[test]
    fn test_reference_gun_out_of_range() {
        let layout = GunLayout {
            ship_class: ShipClass::Frigate,
            guns: &FRIGATE_GUNS_FOR_TEST,
            reference_gun: 5,
        };
        assert!(layout.reference_gun().is_none());
    }

    static FRIGATE_GUNS_FOR_TEST: [GunSpec; 1] = [GunSpec::new("Middle Gun", -6.4, ArcRule::Unrestricted)];

    #[test]
    fn test_ship_class_layout_lookup() {
        assert_eq!(ShipClass::Frigate.layout().gun_count(), 2);
        assert_eq!(ShipClass::Battleship.layout().gun_count(), 3);
        assert_eq!(ShipClass::Battleship.layout().ship_class, ShipClass::Battleship);
    }
}
