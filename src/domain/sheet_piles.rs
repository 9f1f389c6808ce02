use crate::cms::{CmsClient, Key, QueryOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;

const COLLECTION: &str = "sheet_piles";
const SERIES_COLLECTION: &str = "sheet_pile_series";
const FIELDS: [&str; 8] = [
    "id", "model", "series", "width", "height", "thickness", "weight", "moment",
];

/// Series id that selects the whole profile table.
pub const ALL_SERIES: &str = "all";

/// A sheet pile profile. Dimensions are millimeters, weight is kg/m and the
/// section modulus is cm³/m.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetPile {
    pub id: String,
    pub model: String,
    pub series: String,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    pub weight: f64,
    pub moment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetPileSeries {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SheetPileRow {
    pub id: Key,
    pub model: String,
    pub series: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub thickness: Option<f64>,
    pub weight: Option<f64>,
    pub moment: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SeriesRow {
    id: Key,
    label: String,
}

pub fn transform_sheet_pile(row: SheetPileRow) -> SheetPile {
    SheetPile {
        id: row.id.as_string(),
        model: row.model,
        series: row.series.unwrap_or_default(),
        width: row.width.unwrap_or_default(),
        height: row.height.unwrap_or_default(),
        thickness: row.thickness.unwrap_or_default(),
        weight: row.weight.unwrap_or_default(),
        moment: row.moment.unwrap_or_default(),
    }
}

fn active_series(series: Option<&str>) -> Option<&str> {
    series.filter(|s| !s.is_empty() && *s != ALL_SERIES)
}

/// Fetch the sheet pile profile table, optionally limited to one series.
/// Degrades to the built-in table with the same filter applied.
pub async fn fetch_sheet_piles(cms: &CmsClient, series: Option<&str>) -> Vec<SheetPile> {
    let mut filter = json!({ "status": { "_eq": "published" } });
    if let Some(series) = active_series(series) {
        filter["series"] = json!({ "_eq": series });
    }

    let options = QueryOptions::new()
        .fields(FIELDS)
        .filter(filter)
        .sort(["series", "moment"]);

    let rows: Vec<SheetPileRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return rows.into_iter().map(transform_sheet_pile).collect();
    }

    let mut fallback = sheet_piles_fallback().clone();
    if let Some(series) = active_series(series) {
        fallback.retain(|p| p.series == series);
    }
    fallback
}

/// Fetch the series filter list. The all-series entry always comes first,
/// whether the rows come from the CMS or the fallback.
pub async fn fetch_sheet_pile_series(cms: &CmsClient) -> Vec<SheetPileSeries> {
    let options = QueryOptions::new().fields(["id", "label"]).sort(["sort"]);

    let rows: Vec<SeriesRow> = cms.fetch_items(SERIES_COLLECTION, &options).await;
    if !rows.is_empty() {
        let mut series = vec![SheetPileSeries {
            id: ALL_SERIES.to_string(),
            label: "Все".to_string(),
        }];
        series.extend(rows.into_iter().map(|row| SheetPileSeries {
            id: row.id.as_string(),
            label: row.label,
        }));
        return series;
    }

    sheet_pile_series_fallback().clone()
}

fn pile(
    id: &str,
    model: &str,
    series: &str,
    width: f64,
    height: f64,
    thickness: f64,
    weight: f64,
    moment: f64,
) -> SheetPile {
    SheetPile {
        id: id.to_string(),
        model: model.to_string(),
        series: series.to_string(),
        width,
        height,
        thickness,
        weight,
        moment,
    }
}

static SHEET_PILES_FALLBACK: LazyLock<Vec<SheetPile>> = LazyLock::new(|| {
    vec![
        pile("l5-um", "Л5-УМ", "RU", 500.0, 236.0, 11.0, 113.0, 2962.0),
        pile("az-13-770", "AZ 13-770", "AZ", 770.0, 344.0, 8.5, 76.4, 1300.0),
        pile("az-18-700", "AZ 18-700", "AZ", 700.0, 420.0, 9.5, 81.6, 1800.0),
        pile("az-26-700", "AZ 26-700", "AZ", 700.0, 460.0, 12.2, 96.9, 2600.0),
        pile("au-14", "AU 14", "AU", 750.0, 408.0, 10.0, 77.7, 1405.0),
        pile("au-18", "AU 18", "AU", 750.0, 441.0, 10.5, 88.5, 1800.0),
        pile("au-25", "AU 25", "AU", 750.0, 485.0, 12.0, 110.4, 2500.0),
        pile("vl-603", "VL 603", "VL", 600.0, 310.0, 9.0, 73.6, 1200.0),
        pile("vl-606a", "VL 606A", "VL", 600.0, 435.0, 9.0, 86.1, 2250.0),
        pile("gu-16n", "GU 16N", "GU", 600.0, 430.0, 10.2, 84.8, 1600.0),
        pile("gu-22n", "GU 22N", "GU", 600.0, 450.0, 11.1, 86.1, 2200.0),
    ]
});

static SERIES_FALLBACK: LazyLock<Vec<SheetPileSeries>> = LazyLock::new(|| {
    [
        (ALL_SERIES, "Все"),
        ("RU", "Л5-УМ (РФ)"),
        ("AZ", "Larssen AZ"),
        ("AU", "Arcelor AU"),
        ("VL", "VL Series"),
        ("GU", "GU Series"),
    ]
    .iter()
    .map(|(id, label)| SheetPileSeries {
        id: id.to_string(),
        label: label.to_string(),
    })
    .collect()
});

pub fn sheet_piles_fallback() -> &'static Vec<SheetPile> {
    &SHEET_PILES_FALLBACK
}

pub fn sheet_pile_series_fallback() -> &'static Vec<SheetPileSeries> {
    &SERIES_FALLBACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_minimal_row_is_total() {
        let row: SheetPileRow =
            serde_json::from_value(json!({ "id": "l5-um", "model": "Л5-УМ" })).unwrap();

        let pile = transform_sheet_pile(row);
        assert_eq!(pile.id, "l5-um");
        assert_eq!(pile.series, "");
        assert_eq!(pile.width, 0.0);
        assert_eq!(pile.moment, 0.0);
    }

    #[test]
    fn test_transform_accepts_integer_numerics() {
        let row: SheetPileRow = serde_json::from_value(json!({
            "id": "az-18-700",
            "model": "AZ 18-700",
            "series": "AZ",
            "width": 700,
            "thickness": 9.5
        }))
        .unwrap();

        let pile = transform_sheet_pile(row);
        assert_eq!(pile.width, 700.0);
        assert_eq!(pile.thickness, 9.5);
    }

    #[test]
    fn test_fallback_table_and_series() {
        let piles = sheet_piles_fallback();
        assert_eq!(piles.len(), 11);
        assert!(piles.iter().all(|p| p.weight > 0.0 && p.moment > 0.0));

        let series = sheet_pile_series_fallback();
        assert_eq!(series[0].id, ALL_SERIES);
        assert_eq!(series.len(), 6);
    }

    #[test]
    fn test_series_filter_on_fallback() {
        let az: Vec<&SheetPile> = sheet_piles_fallback()
            .iter()
            .filter(|p| p.series == "AZ")
            .collect();
        assert_eq!(az.len(), 3);
    }
}
