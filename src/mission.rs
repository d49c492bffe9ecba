use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::fs;
use tracing::{debug, info};

use crate::models::{FiringSolution, IFireControl, PolarOffset, ShipClass, WindVector};

/// ミッションファイルのメタデータ
#[derive(Debug, Deserialize, Serialize)]
pub struct MissionMeta {
    pub version: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// 方位角と距離
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PolarConfig {
    pub azimuth_deg: f64,
    pub distance_m: f64,
}

impl From<PolarConfig> for PolarOffset {
    fn from(config: PolarConfig) -> Self {
        PolarOffset::new(config.azimuth_deg, config.distance_m)
    }
}

/// 風の設定
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct WindConfig {
    pub azimuth_deg: f64,
    pub strength_m: f64,
}

impl From<WindConfig> for WindVector {
    fn from(config: WindConfig) -> Self {
        WindVector::new(config.azimuth_deg, config.strength_m)
    }
}

/// 較正射撃の設定
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CalibrationConfig {
    /// 艦の中心から観測した着弾点
    pub explosion: PolarConfig,
    /// 逆算した風をこのミッションの射撃諸元に適用するか
    #[serde(default)]
    pub transfer_wind: bool,
}

/// 射撃ミッション1件分の設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MissionConfig {
    pub id: String,
    pub ship: ShipClass,
    pub heading_deg: f64,
    pub commander: PolarConfig,
    #[serde(default)]
    pub wind: Option<WindConfig>,
    #[serde(default)]
    pub calibration: Option<CalibrationConfig>,
}

/// 射撃ミッションファイル
#[derive(Debug, Deserialize, Serialize)]
pub struct MissionFile {
    pub meta: MissionMeta,
    pub missions: Vec<MissionConfig>,
}

/// ミッションの実行結果
#[derive(Debug, Clone, PartialEq)]
pub struct MissionOutcome {
    pub id: String,
    pub ship: ShipClass,
    /// 較正射撃から逆算した風（較正なしなら `None`）
    pub calibrated_wind: Option<WindVector>,
    /// 射撃諸元の計算に使った風
    pub wind_used: WindVector,
    pub solutions: Vec<FiringSolution>,
}

impl MissionFile {
    /// YAMLファイルからミッションを読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MissionError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(MissionError::FileNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| MissionError::IoError(path.to_path_buf(), e))?;

        let file: MissionFile = serde_yaml::from_str(&contents)
            .map_err(|e| MissionError::ParseError(path.to_path_buf(), e))?;

        file.validate()?;

        Ok(file)
    }

    /// 全ミッションの検証
    pub fn validate(&self) -> Result<(), MissionError> {
        if self.missions.is_empty() {
            return Err(MissionError::ValidationError("no missions defined".to_string()));
        }

        let mut seen = HashSet::new();
        for mission in &self.missions {
            if !seen.insert(mission.id.as_str()) {
                return Err(MissionError::ValidationError(
                    format!("duplicate mission id: {}", mission.id)
                ));
            }
            mission.validate()?;
        }

        Ok(())
    }

    /// 全ミッションを順に実行
    pub fn execute_all(&self) -> Vec<MissionOutcome> {
        info!("ミッション実行開始: {} ({}件)", self.meta.name, self.missions.len());

        let outcomes: Vec<MissionOutcome> = self
            .missions
            .iter()
            .map(|mission| {
                let engine = crate::engine::FiringSolutionEngine::for_ship(mission.ship);
                mission.execute(&engine)
            })
            .collect();

        info!("ミッション実行完了: {}件", outcomes.len());
        outcomes
    }

    /// ミッションの概要を表示
    pub fn print_summary(&self) {
        println!("=== Mission file ===");
        println!("Name: {}", self.meta.name);
        if !self.meta.description.is_empty() {
            println!("Description: {}", self.meta.description);
        }
        println!("Version: {}", self.meta.version);
        println!("Missions: {}", self.missions.len());

        for mission in &self.missions {
            let calibration = match &mission.calibration {
                Some(c) if c.transfer_wind => "calibration + transfer",
                Some(_) => "calibration",
                None => "-",
            };
            println!(
                "  {}: {} heading {:.1}°, target {:.1}° / {:.1} ({})",
                mission.id,
                mission.ship,
                mission.heading_deg,
                mission.commander.azimuth_deg,
                mission.commander.distance_m,
                calibration
            );
        }
    }
}

impl MissionConfig {
    /// 入力値の検証（方位角は0〜360、距離と風力は0以上の有限値）
    pub fn validate(&self) -> Result<(), MissionError> {
        validate_azimuth(&self.id, "heading_deg", self.heading_deg)?;
        validate_azimuth(&self.id, "commander.azimuth_deg", self.commander.azimuth_deg)?;
        validate_distance(&self.id, "commander.distance_m", self.commander.distance_m)?;

        if let Some(wind) = &self.wind {
            validate_azimuth(&self.id, "wind.azimuth_deg", wind.azimuth_deg)?;
            validate_distance(&self.id, "wind.strength_m", wind.strength_m)?;
        }

        if let Some(calibration) = &self.calibration {
            validate_azimuth(&self.id, "calibration.explosion.azimuth_deg", calibration.explosion.azimuth_deg)?;
            validate_distance(&self.id, "calibration.explosion.distance_m", calibration.explosion.distance_m)?;
        }

        Ok(())
    }

    /// ミッションを実行
    ///
    /// 較正射撃が指定されていれば風を逆算し、`transfer_wind` が真なら
    /// その風で射撃諸元を計算します。それ以外は設定された風（未指定なら無風）を使います。
    pub fn execute(&self, fire_control: &dyn IFireControl) -> MissionOutcome {
        let commander = PolarOffset::from(self.commander);
        let configured_wind = self.wind.map(WindVector::from).unwrap_or_default();

        let calibrated_wind = self.calibration.map(|calibration| {
            fire_control.calibrate(self.heading_deg, commander, calibration.explosion.into())
        });

        let wind_used = match (calibrated_wind, self.calibration) {
            (Some(wind), Some(calibration)) if calibration.transfer_wind => {
                debug!("{}: 逆算した風を転送 ({:.1}°, {})", self.id, wind.azimuth_deg, wind.strength);
                wind
            }
            _ => configured_wind,
        };

        MissionOutcome {
            id: self.id.clone(),
            ship: fire_control.ship_class(),
            calibrated_wind,
            wind_used,
            solutions: fire_control.solve(self.heading_deg, commander, wind_used),
        }
    }
}

fn validate_azimuth(id: &str, field: &str, value: f64) -> Result<(), MissionError> {
    if !value.is_finite() || !(0.0..=360.0).contains(&value) {
        return Err(MissionError::ValidationError(
            format!("mission {}: {} must be within 0..=360, got {}", id, field, value)
        ));
    }
    Ok(())
}

fn validate_distance(id: &str, field: &str, value: f64) -> Result<(), MissionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(MissionError::ValidationError(
            format!("mission {}: {} must be a non-negative number, got {}", id, field, value)
        ));
    }
    Ok(())
}

/// ミッション読み込みエラー
#[derive(Debug)]
pub enum MissionError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
}

impl std::fmt::Display for MissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionError::FileNotFound(path) => {
                write!(f, "mission file not found: {}", path.display())
            }
            MissionError::IoError(path, err) => {
                write!(f, "failed to read {}: {}", path.display(), err)
            }
            MissionError::ParseError(path, err) => {
                write!(f, "YAML parse error in {}: {}", path.display(), err)
            }
            MissionError::ValidationError(msg) => {
                write!(f, "invalid mission: {}", msg)
            }
        }
    }
}

impl std::error::Error for MissionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FiringSolutionEngine;

    const SAMPLE: &str = r#"
meta:
  version: "1.0"
  name: "Harbour approach"
missions:
  - id: "F1"
    ship: frigate
    heading_deg: 0.0
    commander: { azimuth_deg: 90.0, distance_m: 300.0 }
  - id: "B1"
    ship: battleship
    heading_deg: 0.0
    commander: { azimuth_deg: 0.0, distance_m: 500.0 }
    wind: { azimuth_deg: 45.0, strength_m: 20.0 }
  - id: "F2"
    ship: frigate
    heading_deg: 0.0
    commander: { azimuth_deg: 0.0, distance_m: 100.0 }
    wind: { azimuth_deg: 270.0, strength_m: 50.0 }
    calibration:
      explosion: { azimuth_deg: 20.5, distance_m: 85.6 }
      transfer_wind: true
"#;

    fn sample() -> MissionFile {
        serde_yaml::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_and_validate() {
        let file = sample();
        assert_eq!(file.meta.name, "Harbour approach");
        assert_eq!(file.missions.len(), 3);
        assert_eq!(file.missions[1].ship, ShipClass::Battleship);
        assert!(file.missions[0].wind.is_none());
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let mut file = sample();
        file.missions[0].heading_deg = 361.0;
        let err = file.validate().unwrap_err();
        assert!(err.to_string().contains("heading_deg"));

        let mut file = sample();
        file.missions[1].commander.distance_m = -1.0;
        assert!(file.validate().is_err());

        let mut file = sample();
        file.missions[1].wind = Some(WindConfig { azimuth_deg: f64::NAN, strength_m: 0.0 });
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_duplicate_ids() {
        let mut file = sample();
        file.missions[2].id = "F1".to_string();
        let err = file.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate mission id"));
    }

    #[test]
    fn test_validation_rejects_empty() {
        let mut file = sample();
        file.missions.clear();
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_unknown_ship_fails_to_parse() {
        let yaml = SAMPLE.replace("ship: battleship", "ship: submarine");
        assert!(serde_yaml::from_str::<MissionFile>(&yaml).is_err());
    }

    #[test]
    fn test_execute_uses_configured_wind() {
        let file = sample();
        let engine = FiringSolutionEngine::for_ship(ShipClass::Battleship);
        let outcome = file.missions[1].execute(&engine);

        assert_eq!(outcome.calibrated_wind, None);
        assert_eq!(outcome.wind_used, WindVector::new(45.0, 20.0));
        assert_eq!(outcome.solutions.len(), 3);
    }

    #[test]
    fn test_execute_transfers_calibrated_wind() {
        let file = sample();
        let engine = FiringSolutionEngine::for_ship(ShipClass::Frigate);
        let outcome = file.missions[2].execute(&engine);

        // 予想着弾点 (1080.2, 1000) と実着弾点 ≈ (1080.2, 1030) の差
        assert_eq!(outcome.calibrated_wind, Some(WindVector::new(90.0, 30.0)));
        assert_eq!(outcome.wind_used, WindVector::new(90.0, 30.0));
    }

    #[test]
    fn test_execute_without_transfer_keeps_configured_wind() {
        let mut file = sample();
        if let Some(calibration) = file.missions[2].calibration.as_mut() {
            calibration.transfer_wind = false;
        }
        let engine = FiringSolutionEngine::for_ship(ShipClass::Frigate);
        let outcome = file.missions[2].execute(&engine);

        assert!(outcome.calibrated_wind.is_some());
        assert_eq!(outcome.wind_used, WindVector::new(270.0, 50.0));
    }

    #[test]
    fn test_execute_all_in_order() {
        let outcomes = sample().execute_all();
        let ids: Vec<&str> = outcomes.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["F1", "B1", "F2"]);
        assert_eq!(outcomes[0].solutions.len(), 2);
        assert_eq!(outcomes[1].solutions.len(), 3);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("navalcalc_mission_{}.yaml", std::process::id()));
        fs::write(&path, SAMPLE).unwrap();

        let file = MissionFile::from_file(&path).unwrap();
        assert_eq!(file.missions.len(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bundled_sample_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("missions/sample.yaml");
        let file = MissionFile::from_file(&path).unwrap();
        let outcomes = file.execute_all();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].wind_used, WindVector::new(90.0, 30.0));
    }

    #[test]
    fn test_from_file_missing() {
        let err = MissionFile::from_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, MissionError::FileNotFound(_)));
    }
}
